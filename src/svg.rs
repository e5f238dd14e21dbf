//! SVG logo rasterization.

use image::RgbaImage;

use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::pixel::unpremultiply_rgba8_in_place;
use crate::text::FontLibrary;

const MAX_DIM: u32 = 16_384;

/// Parse an SVG document and rasterize it so its longer side is `long_side` pixels.
///
/// Text inside the SVG resolves against `fonts`. The result is straight-alpha RGBA, ready to be
/// passed to [`crate::place_logo`].
pub fn rasterize_svg_logo(
    bytes: &[u8],
    fonts: &FontLibrary,
    long_side: u32,
) -> PosterResult<RgbaImage> {
    let opts = usvg::Options {
        fontdb: fonts.database(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| PosterError::invalid_input(format!("svg parse failed: {e}")))?;

    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(PosterError::invalid_input("svg has invalid width/height"));
    }
    let scale = long_side.max(1) as f32 / sw.max(sh);
    let width = ((sw * scale).ceil() as u32).max(1);
    let height = ((sh * scale).ceil() as u32).max(1);
    if width > MAX_DIM || height > MAX_DIM {
        return Err(PosterError::invalid_input(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PosterError::render("failed to allocate svg pixmap"))?;
    let xform =
        resvg::tiny_skia::Transform::from_scale(width as f32 / sw, height as f32 / sh);
    resvg::render(&tree, xform, &mut pixmap.as_mut());
    tracing::debug!(width, height, "rasterized svg logo");

    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| PosterError::render("svg pixmap size mismatch"))
}
