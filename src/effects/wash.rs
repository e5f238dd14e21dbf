use image::RgbImage;
use rayon::prelude::*;

use crate::foundation::color::{Rgb8, clamp_f32};

/// Neutral gray used for the washed-out cinematic tone.
pub const WASH_GRAY: Rgb8 = Rgb8::new(32, 32, 32);

/// Flat blend of [`WASH_GRAY`] over the whole image. Recommended strengths are 0.08 to 0.15;
/// zero returns the input untouched. Strength is a blend factor, so values above 1.0 act as 1.0.
pub fn apply_wash(img: RgbImage, strength: f32) -> RgbImage {
    let t = clamp_f32(strength, 0.0, 1.0);
    if t <= 0.0 {
        return img;
    }
    tracing::debug!(strength = t, "apply wash");

    let gray = WASH_GRAY.to_array();
    let mut img = img;
    img.par_chunks_mut(3).for_each(|px| {
        for (c, g) in px.iter_mut().zip(gray) {
            let v = f32::from(*c) + (f32::from(g) - f32::from(*c)) * t;
            *c = v.round().clamp(0.0, 255.0) as u8;
        }
    });
    img
}
