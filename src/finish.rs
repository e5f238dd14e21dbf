//! Rounded-corner mask and optional border ring.

use image::{GrayImage, RgbImage, RgbaImage};
use kurbo::Shape;

use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::pixel::blend_toward_masked;
use crate::options::BorderOptions;

/// Corner radius: 3% of the shorter side, floored.
pub fn corner_radius(width: u32, height: u32) -> u32 {
    (width.min(height) as f32 * 0.03) as u32
}

/// Anti-aliased coverage of a rounded rectangle inset by `inset` on every side.
pub fn rounded_rect_mask(
    width: u32,
    height: u32,
    inset: u32,
    radius: f64,
) -> PosterResult<GrayImage> {
    let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(PosterError::render(format!(
                "mask {width}x{height} exceeds rasterizer limits"
            )));
        }
    };
    if 2 * u64::from(inset) >= u64::from(width.min(height)) {
        return Ok(GrayImage::new(width, height));
    }

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

    let i = f64::from(inset);
    let rr = kurbo::RoundedRect::new(i, i, f64::from(width) - i, f64::from(height) - i, radius);
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in rr.path_elements(0.1) {
        p.push(el);
    }
    ctx.fill_path(&p);

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let alpha = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    GrayImage::from_raw(width, height, alpha)
        .ok_or_else(|| PosterError::render("mask buffer size mismatch"))
}

/// Clip the poster to rounded corners, then optionally put it on a border-coloured plate with
/// a ring of `width_px` traced inside the outer edge.
///
/// Without a border the corners are expressed only in alpha; with one the result is opaque.
pub fn finish_corners_and_border(
    img: RgbImage,
    border: &BorderOptions,
) -> PosterResult<RgbaImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Ok(RgbaImage::new(w, h));
    }
    let radius = corner_radius(w, h);
    let outer = rounded_rect_mask(w, h, 0, f64::from(radius))?;
    tracing::debug!(
        radius,
        border = border.enabled,
        border_px = border.width_px,
        "finish corners"
    );

    if !border.enabled {
        return Ok(with_alpha(&img, &outer));
    }

    let mut img = img;
    let outside: Vec<u8> = outer.as_raw().iter().map(|a| 255 - a).collect();
    blend_toward_masked(&mut img, border.color, &outside)?;

    if border.width_px > 0 {
        let inner_radius = radius.saturating_sub(border.width_px).max(1);
        let inner = rounded_rect_mask(w, h, border.width_px, f64::from(inner_radius))?;
        let ring: Vec<u8> = outer
            .as_raw()
            .iter()
            .zip(inner.as_raw())
            .map(|(o, i)| o.saturating_sub(*i))
            .collect();
        blend_toward_masked(&mut img, border.color, &ring)?;
    }

    let opaque = GrayImage::from_pixel(w, h, image::Luma([255]));
    Ok(with_alpha(&img, &opaque))
}

fn with_alpha(img: &RgbImage, alpha: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        image::Rgba([r, g, b, alpha.get_pixel(x, y).0[0]])
    })
}

#[cfg(test)]
#[path = "../tests/unit/finish.rs"]
mod tests;
