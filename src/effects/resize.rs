use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

/// Scale `src` so it fully covers `target_w`×`target_h`, apply the extra `zoom`, then
/// center-crop. The result is always exactly the target size.
///
/// With `zoom < 1` the scaled image no longer covers the target; the uncovered margin is black.
pub fn resize_cover(src: &DynamicImage, target_w: u32, target_h: u32, zoom: f32) -> RgbImage {
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 {
        // Nothing to stretch; an empty source covers as solid black.
        return RgbImage::new(target_w, target_h);
    }

    let base_scale = (target_w as f64 / w as f64).max(target_h as f64 / h as f64);
    let zoom = if zoom.is_finite() { zoom.max(0.01) } else { 1.0 };
    let scale = base_scale * f64::from(zoom);

    let new_w = ((w as f64) * scale).round().max(1.0) as u32;
    let new_h = ((h as f64) * scale).round().max(1.0) as u32;

    let rgb = src.to_rgb8();
    let resized = if (new_w, new_h) == (w, h) {
        rgb
    } else {
        imageops::resize(&rgb, new_w, new_h, FilterType::Lanczos3)
    };
    if (new_w, new_h) == (target_w, target_h) {
        return resized;
    }

    let mut out = RgbImage::new(target_w, target_h);
    let x = (i64::from(target_w) - i64::from(new_w)) / 2;
    let y = (i64::from(target_h) - i64::from(new_h)) / 2;
    imageops::replace(&mut out, &resized, x, y);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resize.rs"]
mod tests;
