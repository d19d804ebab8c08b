//! macroquad window, keyboard and presentation

use log::{debug, info, warn};
use macroquad::prelude::*;

use crate::config::Settings;
use crate::simulation::{FrameClock, FrameInput, Frame, KeyState, Platform};

/// The presentable surface: its size is all the presenter needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top-left corner that centres a `w`x`h` image on this screen
    pub fn centered_origin(&self, w: u32, h: u32) -> (f32, f32) {
        (
            ((self.width - w as f32) * 0.5).floor(),
            ((self.height - h as f32) * 0.5).floor(),
        )
    }
}

/// Uploaded copy of the derived image, tagged with its cache generation
struct UploadedFrame {
    texture: Texture2D,
    generation: u64,
}

pub struct MacroquadPlatform {
    screen: Screen,
    clock: FrameClock,
    target_fps: u32,
    clear_color: Color,
    uploaded: Option<UploadedFrame>,
}

impl MacroquadPlatform {
    pub fn new(settings: &Settings) -> Self {
        let [r, g, b] = settings.clear_color;
        Self {
            screen: Screen::new(screen_width(), screen_height()),
            clock: FrameClock::new(settings.max_frame_time),
            target_fps: settings.target_fps,
            clear_color: Color::from_rgba(r, g, b, 255),
            uploaded: None,
        }
    }

    /// Ask the window to match the sprite's untransformed size
    pub fn fit_to(&mut self, (width, height): (u32, u32)) {
        info!("Fitting window to sprite ({}x{})", width, height);
        request_new_screen_size(width as f32, height as f32);
    }

    fn upload(&mut self, frame: &Frame<'_>) {
        let (w, h) = frame.image.dimensions();
        if w > u16::MAX as u32 || h > u16::MAX as u32 {
            warn!("Frame {}x{} too large for a texture, keeping previous", w, h);
            return;
        }

        let texture = Texture2D::from_rgba8(w as u16, h as u16, frame.image.as_raw());
        texture.set_filter(FilterMode::Nearest);
        self.uploaded = Some(UploadedFrame {
            texture,
            generation: frame.generation,
        });
    }
}

impl Platform for MacroquadPlatform {
    fn frame_time(&mut self) -> f32 {
        self.clock.tick(self.target_fps)
    }

    fn poll_input(&mut self) -> FrameInput {
        let size = (screen_width(), screen_height());
        let resized = if size != (self.screen.width, self.screen.height) {
            Some(size)
        } else {
            None
        };

        FrameInput {
            quit_requested: is_quit_requested(),
            escape_pressed: is_key_pressed(KeyCode::Escape),
            resized,
            keys: KeyState {
                up: is_key_down(KeyCode::Up),
                down: is_key_down(KeyCode::Down),
                left: is_key_down(KeyCode::Left),
                right: is_key_down(KeyCode::Right),
                z: is_key_down(KeyCode::Z),
                x: is_key_down(KeyCode::X),
            },
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        info!("Window resized to {}x{}", width, height);
        self.screen = Screen::new(width, height);
    }

    fn present(&mut self, frame: Frame<'_>) {
        let stale = match &self.uploaded {
            Some(uploaded) => uploaded.generation != frame.generation,
            None => true,
        };
        if stale || frame.full_redraw {
            debug!("Uploading frame generation {}", frame.generation);
            self.upload(&frame);
        }

        clear_background(self.clear_color);

        if let Some(uploaded) = &self.uploaded {
            let (w, h) = (uploaded.texture.width() as u32, uploaded.texture.height() as u32);
            let (x, y) = self.screen.centered_origin(w, h);
            draw_texture(&uploaded.texture, x, y, WHITE);
        }
    }

    async fn flip(&mut self) {
        next_frame().await;
    }
}
