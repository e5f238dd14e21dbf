use image::RgbImage;
use rayon::prelude::*;

use crate::foundation::color::clamp_f32;
use crate::foundation::pixel::mul_div255;

/// Per-row black coverage for the matte band and the fade ramp above it.
///
/// Rows at or below `matte_start` are 255; rows in `[fade_start, matte_start)` ramp linearly
/// from 0 upwards; rows above the fade are 0.
pub fn matte_fade_rows(height: u32, matte_height_ratio: f32, fade_height_ratio: f32) -> Vec<u8> {
    let matte_ratio = clamp_f32(matte_height_ratio, 0.0, 0.5);
    let fade_ratio = clamp_f32(fade_height_ratio, 0.0, 0.5);

    let matte_h = (height as f32 * matte_ratio) as u32;
    let fade_h = (height as f32 * fade_ratio) as u32;
    let matte_start = height - matte_h.min(height);
    let fade_start = matte_start.saturating_sub(fade_h);

    (0..height)
        .map(|y| {
            if y >= matte_start {
                255
            } else if y >= fade_start {
                let t = (y - fade_start) as f32 / fade_h.max(1) as f32;
                (255.0 * t) as u8
            } else {
                0
            }
        })
        .collect()
}

/// Darken the bottom of the poster into a solid matte with an optional fade ramp above it.
/// Both ratios at zero return the input untouched.
pub fn apply_matte_fade(
    img: RgbImage,
    matte_height_ratio: f32,
    fade_height_ratio: f32,
) -> RgbImage {
    let height = img.height();
    let rows = matte_fade_rows(height, matte_height_ratio, fade_height_ratio);
    if rows.iter().all(|&a| a == 0) {
        return img;
    }
    tracing::debug!(matte_height_ratio, fade_height_ratio, "apply matte/fade");

    let mut img = img;
    let stride = img.width() as usize * 3;
    if stride == 0 {
        return img;
    }
    img.par_chunks_mut(stride)
        .zip(rows.par_iter())
        .for_each(|(row, &alpha)| match alpha {
            0 => {}
            255 => row.fill(0),
            a => {
                let keep = 255 - u16::from(a);
                for c in row.iter_mut() {
                    *c = mul_div255(u16::from(*c), keep);
                }
            }
        });
    img
}

#[cfg(test)]
#[path = "../../tests/unit/effects/matte.rs"]
mod tests;
