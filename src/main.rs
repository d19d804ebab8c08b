//! Mode7: fake perspective sprite viewer
//!
//! Rotates, zooms and vertically squashes a single sprite to imitate a
//! tilted ground plane, SNES mode-7 style:
//! - Left/Right: rotate
//! - Up/Down: tilt (perspective)
//! - Z/X: zoom in/out
//! - Escape: quit

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod mode7;
mod platform;
mod simulation;

use config::{load_or_default, save_settings, SettingsError, SETTINGS_FILE};
use log::{error, info, warn};
use macroquad::prelude::*;
use mode7::{default_sprite, load_sprite, ImageTransformer, InvalidParameter, SpriteError};
use platform::MacroquadPlatform;
use simulation::Simulation;
use thiserror::Error;

/// Exit status for errors before the loop starts
const EXIT_STARTUP_FAILED: i32 = 2;

/// Anything that stops the viewer from starting
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error("bad initial parameters: {0}")]
    Parameter(#[from] InvalidParameter),
}

fn window_conf() -> Conf {
    // Errors are reported from main once logging is up
    let settings = load_or_default(SETTINGS_FILE).unwrap_or_default();
    Conf {
        window_title: format!("Mode7 v{}", VERSION),
        // Bounded by Settings::validate
        window_width: settings.window_width as i32,
        window_height: settings.window_height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Window close goes through the simulation instead of killing the loop
    prevent_quit();

    let status = match start().await {
        Ok(status) => status,
        Err(e) => {
            error!("{}", e);
            EXIT_STARTUP_FAILED
        }
    };

    info!("Exiting with status {}", status);
    std::process::exit(status);
}

async fn start() -> Result<i32, StartupError> {
    let settings = load_or_default(SETTINGS_FILE)?;
    if !std::path::Path::new(SETTINGS_FILE).exists() {
        // Leave an editable copy of the defaults behind
        match save_settings(&settings, SETTINGS_FILE) {
            Ok(()) => info!("Wrote default settings to {}", SETTINGS_FILE),
            Err(e) => warn!("Could not write {}: {}", SETTINGS_FILE, e),
        }
    }

    let sprite = match std::env::args().nth(1) {
        Some(path) => {
            let sprite = load_sprite(&path)?;
            info!("Loaded sprite {} ({}x{})", path, sprite.width(), sprite.height());
            sprite
        }
        None => {
            info!("No sprite given, using checkerboard");
            default_sprite()
        }
    };

    let transformer = ImageTransformer::new(sprite);
    let native_size = transformer.native_size();

    let mut platform = MacroquadPlatform::new(&settings);
    if settings.fit_window_to_sprite {
        platform.fit_to(native_size);
    }

    let mut simulation = Simulation::new(transformer, &settings)?;

    Ok(simulation.run(&mut platform).await)
}
