//! Transform cache
//!
//! Owns the source sprite and the three validated transform parameters.
//! The derived image is only recomputed when a parameter actually changed.

use image::RgbaImage;
use log::{debug, warn};
use thiserror::Error;

use super::transform::{max_zoom, render_mode7};

/// Which transform parameter a write targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Zoom,
    Perspective,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parameter::Zoom => write!(f, "zoom"),
            Parameter::Perspective => write!(f, "perspective"),
        }
    }
}

/// A parameter write that would break the parameter's invariant
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid {parameter} value {value}")]
pub struct InvalidParameter {
    pub parameter: Parameter,
    pub value: f32,
}

/// Cache state: either stale, or holding the image for the current parameters
enum CacheState {
    Dirty,
    Clean(RgbaImage),
}

pub const DEFAULT_ROTATION: f32 = 0.0;
pub const DEFAULT_ZOOM: f32 = 1.0;
pub const DEFAULT_PERSPECTIVE: f32 = 0.5;

/// Rotates, zooms and squashes one sprite, caching the result
pub struct ImageTransformer {
    source: RgbaImage,
    rotation: f32,
    zoom: f32,
    perspective: f32,
    state: CacheState,
    /// Number of recomputes so far
    generation: u64,
}

impl ImageTransformer {
    pub fn new(source: RgbaImage) -> Self {
        Self {
            source,
            rotation: DEFAULT_ROTATION,
            zoom: DEFAULT_ZOOM,
            perspective: DEFAULT_PERSPECTIVE,
            state: CacheState::Dirty,
            generation: 0,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn perspective(&self) -> f32 {
        self.perspective
    }

    /// Rotation in degrees, always in [0, 360)
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Untransformed sprite size
    pub fn native_size(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// How many times the derived image has been rebuilt
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Largest zoom whose render still fits the frame size limit
    pub fn max_zoom(&self) -> f32 {
        let (w, h) = self.source.dimensions();
        max_zoom(w, h)
    }

    /// Set zoom factor. Must be strictly positive and at most [`Self::max_zoom`].
    pub fn set_zoom(&mut self, value: f32) -> Result<(), InvalidParameter> {
        if value.is_nan() || value <= 0.0 || value > self.max_zoom() {
            return Err(InvalidParameter { parameter: Parameter::Zoom, value });
        }
        if value != self.zoom {
            self.zoom = value;
            self.invalidate();
        }
        Ok(())
    }

    /// Set vertical squash factor. Must lie in the open interval (0, 1).
    pub fn set_perspective(&mut self, value: f32) -> Result<(), InvalidParameter> {
        if value.is_nan() || value <= 0.0 || value >= 1.0 {
            return Err(InvalidParameter { parameter: Parameter::Perspective, value });
        }
        if value != self.perspective {
            self.perspective = value;
            self.invalidate();
        }
        Ok(())
    }

    /// Set rotation in degrees. Any finite angle is accepted and wrapped into [0, 360).
    pub fn set_rotation(&mut self, value: f32) {
        if !value.is_finite() {
            warn!("Ignoring non-finite rotation {}", value);
            return;
        }
        let normalized = normalize_degrees(value);
        if normalized != self.rotation {
            self.rotation = normalized;
            self.invalidate();
        }
    }

    /// Current derived image, rebuilt first if any parameter changed
    pub fn image(&mut self) -> &RgbaImage {
        if let CacheState::Dirty = self.state {
            let image = render_mode7(&self.source, self.rotation, self.zoom, self.perspective);
            self.generation += 1;
            debug!(
                "Rendered {}x{} (rot {:.1}, zoom {:.3}, persp {:.3})",
                image.width(),
                image.height(),
                self.rotation,
                self.zoom,
                self.perspective
            );
            self.state = CacheState::Clean(image);
        }

        match &self.state {
            CacheState::Clean(image) => image,
            CacheState::Dirty => unreachable!("cache was just rebuilt"),
        }
    }

    fn invalidate(&mut self) {
        self.state = CacheState::Dirty;
    }
}

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(value: f32) -> f32 {
    let wrapped = value.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn transformer(w: u32, h: u32) -> ImageTransformer {
        ImageTransformer::new(RgbaImage::from_pixel(w, h, Rgba([200, 100, 50, 255])))
    }

    #[test]
    fn test_zoom_accepts_positive() {
        let mut t = transformer(4, 4);
        for v in [0.001, 0.5, 1.0, 3.25, 1000.0] {
            assert!(t.set_zoom(v).is_ok());
            assert_eq!(t.zoom(), v);
        }
    }

    #[test]
    fn test_zoom_rejects_non_positive() {
        let mut t = transformer(4, 4);
        t.set_zoom(2.0).unwrap();
        for v in [0.0, -0.0, -1.0, -1000.0, f32::NAN] {
            let err = t.set_zoom(v).unwrap_err();
            assert_eq!(err.parameter, Parameter::Zoom);
            assert_eq!(t.zoom(), 2.0);
        }
    }

    #[test]
    fn test_zoom_rejects_oversized_render() {
        let mut t = transformer(100, 100);
        let limit = t.max_zoom();
        assert!(t.set_zoom(limit).is_ok());
        assert_eq!(t.zoom(), limit);

        for v in [limit * 1.01, 1e9, f32::INFINITY] {
            let err = t.set_zoom(v).unwrap_err();
            assert_eq!(err.parameter, Parameter::Zoom);
            assert_eq!(t.zoom(), limit);
        }
    }

    #[test]
    fn test_perspective_open_interval() {
        let mut t = transformer(4, 4);
        for v in [0.01, 0.15, 0.5, 0.99] {
            assert!(t.set_perspective(v).is_ok());
            assert_eq!(t.perspective(), v);
        }
        t.set_perspective(0.3).unwrap();
        for v in [0.0, 1.0, -0.2, 1.5, f32::NAN] {
            let err = t.set_perspective(v).unwrap_err();
            assert_eq!(err.parameter, Parameter::Perspective);
            assert_eq!(t.perspective(), 0.3);
        }
    }

    #[test]
    fn test_rotation_wraps() {
        let mut t = transformer(4, 4);
        t.set_rotation(370.0);
        assert_eq!(t.rotation(), 10.0);
        t.set_rotation(-10.0);
        assert_eq!(t.rotation(), 350.0);
        t.set_rotation(720.0);
        assert_eq!(t.rotation(), 0.0);
        t.set_rotation(-1e-9);
        assert!(t.rotation() >= 0.0 && t.rotation() < 360.0);
    }

    #[test]
    fn test_rotation_ignores_non_finite() {
        let mut t = transformer(4, 4);
        t.set_rotation(45.0);
        t.set_rotation(f32::INFINITY);
        t.set_rotation(f32::NAN);
        assert_eq!(t.rotation(), 45.0);
    }

    #[test]
    fn test_first_read_renders_once() {
        let mut t = transformer(8, 8);
        assert_eq!(t.generation(), 0);
        t.image();
        assert_eq!(t.generation(), 1);
        t.image();
        assert_eq!(t.generation(), 1);
    }

    #[test]
    fn test_same_value_keeps_cache() {
        let mut t = transformer(8, 8);
        let before = t.image().as_raw().as_ptr();

        t.set_zoom(DEFAULT_ZOOM).unwrap();
        t.set_perspective(DEFAULT_PERSPECTIVE).unwrap();
        t.set_rotation(DEFAULT_ROTATION);
        t.set_rotation(360.0);

        let after = t.image().as_raw().as_ptr();
        assert_eq!(before, after);
        assert_eq!(t.generation(), 1);
    }

    #[test]
    fn test_rejected_write_keeps_cache() {
        let mut t = transformer(8, 8);
        t.image();
        let _ = t.set_zoom(-1.0);
        let _ = t.set_perspective(1.0);
        t.image();
        assert_eq!(t.generation(), 1);
    }

    #[test]
    fn test_each_change_renders_exactly_once() {
        let mut t = transformer(8, 8);
        t.image();

        t.set_rotation(30.0);
        t.image();
        t.image();
        assert_eq!(t.generation(), 2);

        t.set_zoom(1.5).unwrap();
        t.image();
        assert_eq!(t.generation(), 3);

        t.set_perspective(0.25).unwrap();
        t.image();
        t.image();
        assert_eq!(t.generation(), 4);
    }

    #[test]
    fn test_several_changes_coalesce() {
        let mut t = transformer(8, 8);
        t.set_rotation(15.0);
        t.set_zoom(2.0).unwrap();
        t.set_perspective(0.75).unwrap();
        t.image();
        assert_eq!(t.generation(), 1);
    }

    #[test]
    fn test_render_dimensions() {
        let mut t = transformer(100, 100);
        assert_eq!(t.image().dimensions(), (100, 50));

        t.set_zoom(2.0).unwrap();
        t.set_perspective(0.25).unwrap();
        assert_eq!(t.image().dimensions(), (200, 50));
    }

    #[test]
    fn test_native_size_ignores_transform() {
        let mut t = transformer(30, 20);
        t.set_zoom(3.0).unwrap();
        t.set_rotation(90.0);
        t.image();
        assert_eq!(t.native_size(), (30, 20));
    }

    #[test]
    fn test_error_message() {
        let err = InvalidParameter { parameter: Parameter::Zoom, value: -2.0 };
        assert_eq!(err.to_string(), "invalid zoom value -2");
    }
}
