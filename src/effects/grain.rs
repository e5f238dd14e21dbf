use image::RgbImage;
use rand::distributions::{Distribution, Uniform};
use rand::RngCore;
use rayon::prelude::*;

use crate::effects::blur::blur_gray8;
use crate::foundation::color::clamp_f32;
use crate::foundation::error::PosterResult;

const GRAIN_BLUR_SIGMA: f32 = 1.5;

/// Single-channel noise field centred on mid-gray with a spread of `±128 × amount`, lightly
/// blurred.
pub fn grain_field(
    width: u32,
    height: u32,
    amount: f32,
    rng: &mut dyn RngCore,
) -> PosterResult<Vec<u8>> {
    let amount = clamp_f32(amount, 0.0, 0.6);
    let n = (width as usize) * (height as usize);
    if amount <= 0.0 {
        return Ok(vec![128u8; n]);
    }

    let spread = 128.0 * amount;
    let dist = Uniform::new_inclusive(-spread, spread);
    let noise: Vec<u8> = dist
        .sample_iter(rng)
        .take(n)
        .map(|v: f32| (128.0 + v).clamp(0.0, 255.0) as u8)
        .collect();
    blur_gray8(&noise, width, height, GRAIN_BLUR_SIGMA)
}

/// Film grain: blend a fresh noise field into every channel by `amount`.
/// Zero returns the input untouched without drawing from `rng`.
pub fn apply_grain(img: RgbImage, amount: f32, rng: &mut dyn RngCore) -> PosterResult<RgbImage> {
    let amount = clamp_f32(amount, 0.0, 0.6);
    if amount <= 0.0 {
        return Ok(img);
    }
    tracing::debug!(amount, "apply grain");

    let mut img = img;
    let (w, h) = img.dimensions();
    let field = grain_field(w, h, amount, rng)?;

    let keep = 1.0 - amount;
    img.par_chunks_mut(3)
        .zip(field.par_iter())
        .for_each(|(px, &g)| {
            let g = f32::from(g) * amount;
            for c in px.iter_mut() {
                *c = (f32::from(*c) * keep + g).round().clamp(0.0, 255.0) as u8;
            }
        });
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
