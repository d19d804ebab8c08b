//! Sprite loading

use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load the source sprite
#[derive(Debug, Error)]
#[error("failed to load sprite {}: {source}", .path.display())]
pub struct SpriteError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// Load a PNG/JPEG/BMP file as RGBA8
pub fn load_sprite<P: AsRef<Path>>(path: P) -> Result<RgbaImage, SpriteError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| SpriteError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Generated checkerboard, used when no sprite path is given
pub fn checkerboard(width: u32, height: u32, cell: u32, color1: Rgba<u8>, color2: Rgba<u8>) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            color1
        } else {
            color2
        }
    })
}

/// Sprite used when no path is given on the command line
pub fn default_sprite() -> RgbaImage {
    checkerboard(256, 256, 32, Rgba([230, 230, 230, 255]), Rgba([60, 90, 160, 255]))
}
