//! Smoke sprite loading

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Load a sprite from disk as RGBA
pub fn load(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to load sprite: {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// White radial puff with a smooth alpha falloff, for when no sprite is given
pub fn soft_puff(size: u32) -> RgbaImage {
    let size = size.max(1);
    let center = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = (x as f32 + 0.5 - center) / center;
        let dy = (y as f32 + 0.5 - center) / center;
        let d = (dx * dx + dy * dy).sqrt();
        // smoothstep(1, 0, d), squared for a softer edge
        let t = (1.0 - d).clamp(0.0, 1.0);
        let falloff = t * t * (3.0 - 2.0 * t);
        let alpha = (falloff * falloff * 0.6 * 255.0).round() as u8;
        Rgba([255, 255, 255, alpha])
    })
}
