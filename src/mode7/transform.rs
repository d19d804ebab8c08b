//! Pixel transforms for the mode-7 effect
//!
//! Rotate + uniform scale about the image centre (bilinear, no cropping),
//! followed by a smooth vertical squash that fakes a tilted ground plane.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Slack applied before rounding the rotated bounds up, so that float noise
/// from `sin`/`cos` at right angles does not grow the output by a pixel.
const BOUNDS_EPSILON: f32 = 1e-3;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Largest edge a rendered frame may have, in pixels
pub const MAX_RENDER_DIMENSION: u32 = 4096;

/// Largest zoom at which a `width`x`height` sprite stays within
/// [`MAX_RENDER_DIMENSION`] at every rotation (the diagonal is the widest case)
pub fn max_zoom(width: u32, height: u32) -> f32 {
    let diagonal = (width as f32).hypot(height as f32).max(1.0);
    MAX_RENDER_DIMENSION as f32 / diagonal
}

/// Size of the box that exactly bounds `width`x`height` after rotating by
/// `degrees` and scaling by `zoom`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f32, zoom: f32) -> (u32, u32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let w = width as f32 * zoom;
    let h = height as f32 * zoom;
    let bw = w * cos.abs() + h * sin.abs();
    let bh = w * sin.abs() + h * cos.abs();
    (
        (bw - BOUNDS_EPSILON).ceil().max(1.0) as u32,
        (bh - BOUNDS_EPSILON).ceil().max(1.0) as u32,
    )
}

/// Rotate counter-clockwise (as seen on screen) by `degrees` and scale by
/// `zoom`. Pixels that map outside the source come out transparent.
pub fn rotozoom(source: &RgbaImage, degrees: f32, zoom: f32) -> RgbaImage {
    let (src_w, src_h) = source.dimensions();
    let (out_w, out_h) = rotated_bounds(src_w, src_h, degrees, zoom);
    let (sin, cos) = degrees.to_radians().sin_cos();

    let src_cx = src_w as f32 * 0.5;
    let src_cy = src_h as f32 * 0.5;
    let out_cx = out_w as f32 * 0.5;
    let out_cy = out_h as f32 * 0.5;
    let inv_zoom = 1.0 / zoom;

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        // Inverse-map the destination pixel centre back into source space
        let dx = x as f32 + 0.5 - out_cx;
        let dy = y as f32 + 0.5 - out_cy;
        let sx = (dx * cos - dy * sin) * inv_zoom + src_cx;
        let sy = (dx * sin + dy * cos) * inv_zoom + src_cy;
        *pixel = sample_bilinear(source, sx - 0.5, sy - 0.5);
    }
    out
}

/// Smooth resize to `width` x `floor(height * factor)` (at least one row).
pub fn squash(image: &RgbaImage, factor: f32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let target_h = ((h as f32 * factor).floor() as u32).max(1);
    imageops::resize(image, w, target_h, FilterType::Triangle)
}

/// Full mode-7 pipeline: rotozoom then perspective squash.
pub fn render_mode7(source: &RgbaImage, degrees: f32, zoom: f32, perspective: f32) -> RgbaImage {
    let rotated = rotozoom(source, degrees, zoom);
    squash(&rotated, perspective)
}

/// Bilinear sample at pixel-space coords (pixel centres on integers).
fn sample_bilinear(image: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    // Exact hit, skip blending (keeps identity transforms lossless)
    if fx == 0.0 && fy == 0.0 {
        return texel(image, x0, y0);
    }

    let weights = [
        ((1.0 - fx) * (1.0 - fy), texel(image, x0, y0)),
        (fx * (1.0 - fy), texel(image, x0 + 1, y0)),
        ((1.0 - fx) * fy, texel(image, x0, y0 + 1)),
        (fx * fy, texel(image, x0 + 1, y0 + 1)),
    ];

    // Premultiply so transparent neighbours don't bleed black into edges
    let mut acc = [0.0f32; 4];
    for (w, p) in weights {
        let a = p[3] as f32 * w;
        acc[0] += p[0] as f32 * a;
        acc[1] += p[1] as f32 * a;
        acc[2] += p[2] as f32 * a;
        acc[3] += a;
    }

    if acc[3] <= 0.0 {
        return TRANSPARENT;
    }
    Rgba([
        (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
        acc[3].round().clamp(0.0, 255.0) as u8,
    ])
}

fn texel(image: &RgbaImage, x: i64, y: i64) -> Rgba<u8> {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        TRANSPARENT
    } else {
        *image.get_pixel(x as u32, y as u32)
    }
}
