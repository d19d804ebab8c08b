//! Input snapshot for one frame
//!
//! The platform fills these in from the window; the simulation only ever
//! sees plain data, so it can be driven from tests.

/// Held (not just pressed) state of the movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Zoom in
    pub z: bool,
    /// Zoom out
    pub x: bool,
}

/// Everything the simulation needs to know about input this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Window close was requested
    pub quit_requested: bool,
    /// Escape went down this frame
    pub escape_pressed: bool,
    /// New window size, if it changed since last frame
    pub resized: Option<(f32, f32)>,
    pub keys: KeyState,
}

/// Per-second speeds applied while a key is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speeds {
    pub rotation: f32,
    pub perspective: f32,
    pub zoom: f32,
}

/// Parameter velocities for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocities {
    /// Degrees per second
    pub rotation: f32,
    pub perspective: f32,
    pub zoom: f32,
}

impl Velocities {
    /// Map held keys to velocities. When both keys of a pair are held the
    /// first one checked (up, left, z) wins.
    pub fn from_keys(keys: &KeyState, speeds: &Speeds) -> Self {
        let perspective = if keys.up {
            -speeds.perspective
        } else if keys.down {
            speeds.perspective
        } else {
            0.0
        };

        let rotation = if keys.left {
            speeds.rotation
        } else if keys.right {
            -speeds.rotation
        } else {
            0.0
        };

        let zoom = if keys.z {
            speeds.zoom
        } else if keys.x {
            -speeds.zoom
        } else {
            0.0
        };

        Self { rotation, perspective, zoom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEEDS: Speeds = Speeds { rotation: 100.0, perspective: 0.35, zoom: 2.0 };

    #[test]
    fn test_no_keys_no_motion() {
        let v = Velocities::from_keys(&KeyState::default(), &SPEEDS);
        assert_eq!(v, Velocities::default());
    }

    #[test]
    fn test_single_keys() {
        let up = KeyState { up: true, ..Default::default() };
        assert_eq!(Velocities::from_keys(&up, &SPEEDS).perspective, -0.35);

        let down = KeyState { down: true, ..Default::default() };
        assert_eq!(Velocities::from_keys(&down, &SPEEDS).perspective, 0.35);

        let left = KeyState { left: true, ..Default::default() };
        assert_eq!(Velocities::from_keys(&left, &SPEEDS).rotation, 100.0);

        let right = KeyState { right: true, ..Default::default() };
        assert_eq!(Velocities::from_keys(&right, &SPEEDS).rotation, -100.0);

        let z = KeyState { z: true, ..Default::default() };
        assert_eq!(Velocities::from_keys(&z, &SPEEDS).zoom, 2.0);

        let x = KeyState { x: true, ..Default::default() };
        assert_eq!(Velocities::from_keys(&x, &SPEEDS).zoom, -2.0);
    }

    #[test]
    fn test_opposing_keys_first_wins() {
        let all = KeyState { up: true, down: true, left: true, right: true, z: true, x: true };
        let v = Velocities::from_keys(&all, &SPEEDS);
        assert_eq!(v.perspective, -0.35);
        assert_eq!(v.rotation, 100.0);
        assert_eq!(v.zoom, 2.0);
    }

    #[test]
    fn test_axes_are_independent() {
        let keys = KeyState { down: true, right: true, ..Default::default() };
        let v = Velocities::from_keys(&keys, &SPEEDS);
        assert_eq!(v, Velocities { rotation: -100.0, perspective: 0.35, zoom: 0.0 });
    }
}
