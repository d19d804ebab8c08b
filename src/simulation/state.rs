//! Interactive controller
//!
//! Turns held keys into parameter velocities, integrates them over frame
//! time, and feeds the results into the transform cache. Shadow copies of
//! the parameters only advance when the cache accepts the new value.

use image::RgbaImage;
use log::{debug, info, trace};

use super::input::{FrameInput, Speeds, Velocities};
use crate::config::Settings;
use crate::mode7::{normalize_degrees, ImageTransformer, InvalidParameter};

/// Exit status for a user-initiated quit
pub const EXIT_QUIT: i32 = 0;
/// Exit status held while the loop runs, before a graceful code is set
pub const EXIT_UNSET: i32 = 1;

/// One frame handed to the presenter
pub struct Frame<'a> {
    pub image: &'a RgbaImage,
    /// Cache generation `image` was rendered at
    pub generation: u64,
    /// The window changed; redraw everything
    pub full_redraw: bool,
}

/// Window, input and presentation collaborator driven by [`Simulation::run`]
#[allow(async_fn_in_trait)]
pub trait Platform {
    /// Pace the loop and return seconds since the previous frame
    fn frame_time(&mut self) -> f32;
    fn poll_input(&mut self) -> FrameInput;
    /// Rebind the presentable surface to a new size
    fn resize(&mut self, width: f32, height: f32);
    /// Clear, centre and draw the frame
    fn present(&mut self, frame: Frame<'_>);
    /// Swap buffers and wait for the next frame
    async fn flip(&mut self);
}

pub struct Simulation {
    transformer: ImageTransformer,
    speeds: Speeds,

    running: bool,
    exit_status: i32,
    needs_redraw: bool,

    // Shadow parameters
    r: f32,
    p: f32,
    z: f32,

    velocity: Velocities,
}

impl Simulation {
    /// Build a simulation around `transformer`, starting from the settings'
    /// initial parameters
    pub fn new(mut transformer: ImageTransformer, settings: &Settings) -> Result<Self, InvalidParameter> {
        transformer.set_rotation(settings.initial_rotation);
        transformer.set_perspective(settings.initial_perspective)?;
        transformer.set_zoom(settings.initial_zoom)?;

        Ok(Self {
            transformer,
            speeds: Speeds {
                rotation: settings.rotation_speed,
                perspective: settings.perspective_speed,
                zoom: settings.zoom_speed,
            },
            running: false,
            exit_status: EXIT_QUIT,
            needs_redraw: false,
            r: normalize_degrees(settings.initial_rotation),
            p: settings.initial_perspective,
            z: settings.initial_zoom,
            velocity: Velocities::default(),
        })
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    /// Shadow (rotation, perspective, zoom)
    pub fn shadow(&self) -> (f32, f32, f32) {
        (self.r, self.p, self.z)
    }

    /// Input phase: quit handling, redraw marking and key-to-velocity mapping
    pub fn apply_input(&mut self, input: &FrameInput) {
        if input.quit_requested || input.escape_pressed {
            self.exit_status = EXIT_QUIT;
            self.running = false;
        }

        if input.resized.is_some() {
            self.needs_redraw = true;
        }

        self.velocity = Velocities::from_keys(&input.keys, &self.speeds);
    }

    /// Integration phase: advance the shadow parameters by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let p = self.p + self.velocity.perspective * dt;
        match self.transformer.set_perspective(p) {
            Ok(()) => self.p = p,
            Err(e) => trace!("Holding perspective at {}: {}", self.p, e),
        }

        self.r = normalize_degrees(self.r + self.velocity.rotation * dt);
        self.transformer.set_rotation(self.r);

        let z = self.z + self.velocity.zoom * dt;
        match self.transformer.set_zoom(z) {
            Ok(()) => self.z = z,
            Err(e) => trace!("Holding zoom at {}: {}", self.z, e),
        }
    }

    /// Render phase: the current derived image
    pub fn frame(&mut self) -> Frame<'_> {
        let full_redraw = std::mem::take(&mut self.needs_redraw);
        // Rebuild first so the generation matches the image handed out
        self.transformer.image();
        let generation = self.transformer.generation();
        Frame {
            image: self.transformer.image(),
            generation,
            full_redraw,
        }
    }

    /// Run ticks until quit, returning the exit status
    pub async fn run<P: Platform>(&mut self, platform: &mut P) -> i32 {
        self.running = true;
        self.exit_status = EXIT_UNSET;

        while self.running() {
            let dt = platform.frame_time();

            let input = platform.poll_input();
            if let Some((width, height)) = input.resized {
                platform.resize(width, height);
            }
            self.apply_input(&input);

            self.update(dt);
            platform.present(self.frame());
            platform.flip().await;
        }

        let (r, p, z) = self.shadow();
        debug!("Shadow parameters at exit: rotation {:.1}, perspective {:.3}, zoom {:.3}", r, p, z);
        info!(
            "Leaving render loop with status {} (rotation {:.1}, perspective {:.3}, zoom {:.3})",
            self.exit_status(),
            self.transformer.rotation(),
            self.transformer.perspective(),
            self.transformer.zoom()
        );
        self.exit_status()
    }
}
