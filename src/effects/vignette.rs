use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::effects::blur::blur_gray8;
use crate::foundation::color::{Rgb8, clamp_f32};
use crate::foundation::error::PosterResult;
use crate::foundation::pixel::blend_toward_masked;

/// Number of concentric rings accumulated into the mask.
const RINGS: u32 = 60;
/// Softening blur applied to the ring mask, in full-resolution pixels.
const BLUR_SIGMA_PX: f32 = 90.0;
/// The ring mask is built and blurred at this reduction, then scaled back up.
const MASK_DOWNSCALE: u32 = 8;

/// Build the full-resolution vignette mask: 0 at the center, rising ring by ring towards
/// `255 × strength` at the corners, softened by a Gaussian blur.
pub fn vignette_mask(width: u32, height: u32, strength: f32) -> PosterResult<GrayImage> {
    let strength = clamp_f32(strength, 0.0, 1.0);
    let mw = width.div_ceil(MASK_DOWNSCALE).max(1);
    let mh = height.div_ceil(MASK_DOWNSCALE).max(1);

    let cx = mw as f32 / 2.0;
    let cy = mh as f32 / 2.0;
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);
    let ring_alpha: Vec<u8> = (0..=RINGS)
        .map(|i| (255.0 * strength * i as f32 / RINGS as f32) as u8)
        .collect();

    let mut rings = vec![0u8; (mw as usize) * (mh as usize)];
    for (y, row) in rings.chunks_exact_mut(mw as usize).enumerate() {
        let dy = y as f32 + 0.5 - cy;
        for (x, m) in row.iter_mut().enumerate() {
            let dx = x as f32 + 0.5 - cx;
            let d = (dx * dx + dy * dy).sqrt() / max_r;
            let ring = ((d * RINGS as f32) as u32).min(RINGS);
            *m = ring_alpha[ring as usize];
        }
    }

    let blurred = blur_gray8(&rings, mw, mh, BLUR_SIGMA_PX / MASK_DOWNSCALE as f32)?;
    let small = GrayImage::from_raw(mw, mh, blurred)
        .unwrap_or_else(|| GrayImage::new(mw, mh));
    Ok(imageops::resize(&small, width, height, FilterType::Triangle))
}

/// Radial darkening toward the edges. A strength of zero returns the input untouched.
pub fn apply_vignette(img: RgbImage, strength: f32) -> PosterResult<RgbImage> {
    if strength.is_nan() || strength <= 0.0 {
        return Ok(img);
    }
    tracing::debug!(strength, "apply vignette");

    let mut img = img;
    let mask = vignette_mask(img.width(), img.height(), strength)?;
    blend_toward_masked(&mut img, Rgb8::BLACK, mask.as_raw())?;
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
