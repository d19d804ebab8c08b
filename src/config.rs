//! Viewer settings
//!
//! Optional RON file (`mode7.ron` in the working directory). Every field
//! has a default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "mode7.ron";

/// Degrees per second while left/right is held
pub const ROTATION_SPEED: f32 = 100.0;
/// Perspective units per second while up/down is held
pub const PERSPECTIVE_SPEED: f32 = 0.35;
/// Zoom units per second while z/x is held
pub const ZOOM_SPEED: f32 = 2.0;

/// Largest window edge accepted from the settings file
pub const MAX_WINDOW_SIZE: u32 = 16384;

/// Error type for settings loading
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    /// Resize the window to the sprite's native size on startup
    pub fit_window_to_sprite: bool,
    pub target_fps: u32,
    /// Longest frame step fed to the simulation, in seconds
    pub max_frame_time: f32,
    pub rotation_speed: f32,
    pub perspective_speed: f32,
    pub zoom_speed: f32,
    pub initial_rotation: f32,
    pub initial_perspective: f32,
    pub initial_zoom: f32,
    /// Background RGB
    pub clear_color: [u8; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 600,
            window_height: 600,
            fit_window_to_sprite: false,
            target_fps: 60,
            max_frame_time: 0.25,
            rotation_speed: ROTATION_SPEED,
            perspective_speed: PERSPECTIVE_SPEED,
            zoom_speed: ZOOM_SPEED,
            initial_rotation: 0.0,
            initial_perspective: 0.5,
            initial_zoom: 1.0,
            clear_color: [0, 0, 0],
        }
    }
}

impl Settings {
    /// Check values the simulation can't recover from
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(SettingsError::Invalid("window size must be non-zero".to_string()));
        }
        if self.window_width > MAX_WINDOW_SIZE || self.window_height > MAX_WINDOW_SIZE {
            return Err(SettingsError::Invalid(format!(
                "window size must be at most {}x{}",
                MAX_WINDOW_SIZE, MAX_WINDOW_SIZE
            )));
        }
        if self.target_fps == 0 {
            return Err(SettingsError::Invalid("target_fps must be positive".to_string()));
        }
        if self.max_frame_time.is_nan() || self.max_frame_time <= 0.0 {
            return Err(SettingsError::Invalid("max_frame_time must be positive".to_string()));
        }
        for (name, speed) in [
            ("rotation_speed", self.rotation_speed),
            ("perspective_speed", self.perspective_speed),
            ("zoom_speed", self.zoom_speed),
        ] {
            if !speed.is_finite() || speed < 0.0 {
                return Err(SettingsError::Invalid(format!("{} must be a non-negative number", name)));
            }
        }
        if !self.initial_rotation.is_finite() {
            return Err(SettingsError::Invalid("initial_rotation must be finite".to_string()));
        }
        if self.initial_zoom.is_nan() || self.initial_zoom <= 0.0 {
            return Err(SettingsError::Invalid("initial_zoom must be greater than 0".to_string()));
        }
        if self.initial_perspective.is_nan()
            || self.initial_perspective <= 0.0
            || self.initial_perspective >= 1.0
        {
            return Err(SettingsError::Invalid(
                "initial_perspective must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let contents = fs::read_to_string(path)?;
    load_settings_from_str(&contents)
}

/// Parse and validate settings from a RON string
pub fn load_settings_from_str(s: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = ron::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

/// Save settings to a RON file
pub fn save_settings<P: AsRef<Path>>(settings: &Settings, path: P) -> Result<(), SettingsError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Settings from `mode7.ron` if it exists, defaults otherwise
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    if path.exists() {
        load_settings(path)
    } else {
        Ok(Settings::default())
    }
}
