//! Logo recoloring, sizing and placement.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};

use crate::foundation::color::{Rgb8, average_color, solid_tint};
use crate::foundation::pixel::{PremulLayer, composite_onto_rgb};
use crate::options::{LogoMode, LogoOptions, Template};

/// Where and how large the logo lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogoPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Apply the recolor mode. `None` means the logo is suppressed entirely.
///
/// `Match` fills every opaque pixel with the background averaged down to one pixel; `Hex` uses
/// the configured color. Alpha is preserved exactly in both cases.
pub fn recolor_logo(
    logo: &RgbaImage,
    mode: LogoMode,
    hex: Rgb8,
    background: &DynamicImage,
) -> Option<RgbaImage> {
    match mode {
        LogoMode::None => None,
        LogoMode::Stock => Some(logo.clone()),
        LogoMode::Match => Some(solid_tint(logo, average_color(background))),
        LogoMode::Hex => Some(solid_tint(logo, hex)),
    }
}

/// Width is `scale × canvas_w`, aspect preserved, horizontally centred with the vertical
/// centre at `offset × canvas_h`.
pub fn proportional_placement(
    logo_w: u32,
    logo_h: u32,
    canvas_w: u32,
    canvas_h: u32,
    scale: f32,
    offset: f32,
) -> Option<LogoPlacement> {
    if logo_w == 0 || logo_h == 0 {
        return None;
    }
    let width = (canvas_w as f32 * scale) as u32;
    let height = ((logo_h as f64) * (width as f64) / (logo_w as f64)).round() as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let cy = (canvas_h as f32 * offset) as i64;
    Some(LogoPlacement {
        x: (i64::from(canvas_w) - i64::from(width)) / 2,
        y: cy - i64::from(height) / 2,
        width,
        height,
    })
}

/// Scale the logo down (never up) into the `max_w`×`max_h` box centred at
/// `(box_offset_x × W, box_offset_y × H)`. With the override enabled the configured scale and
/// vertical offset replace the computed ones.
pub fn bounding_box_placement(
    logo_w: u32,
    logo_h: u32,
    canvas_w: u32,
    canvas_h: u32,
    opts: &LogoOptions,
) -> Option<LogoPlacement> {
    if logo_w == 0 || logo_h == 0 {
        return None;
    }

    let (lw, lh) = (logo_w as f64, logo_h as f64);
    let mut scale = f64::from(opts.box_max_w) / lw;
    if lh * scale > f64::from(opts.box_max_h) {
        scale = f64::from(opts.box_max_h) / lh;
    }
    let mut scale = scale.min(1.0);
    let mut offset_y = opts.box_offset_y;

    if opts.override_enabled {
        if let Some(s) = opts.override_scale {
            scale = f64::from(s);
        }
        if let Some(oy) = opts.override_offset_y {
            offset_y = oy;
        }
    }

    let width = (lw * scale) as u32;
    let height = (lh * scale) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let cx = (canvas_w as f32 * opts.box_offset_x) as i64;
    let cy = (canvas_h as f32 * offset_y) as i64;
    Some(LogoPlacement {
        x: cx - i64::from(width / 2),
        y: cy - i64::from(height / 2),
        width,
        height,
    })
}

/// Recolor, size and alpha-composite the logo onto the canvas. An absent or suppressed logo
/// returns the canvas unmodified.
pub fn place_logo(
    canvas: RgbImage,
    logo: Option<&DynamicImage>,
    background: &DynamicImage,
    template: Template,
    opts: &LogoOptions,
) -> RgbImage {
    let Some(logo) = logo else {
        return canvas;
    };
    let rgba = logo.to_rgba8();
    let Some(recolored) = recolor_logo(&rgba, opts.mode, opts.hex, background) else {
        tracing::debug!("logo suppressed by logo_mode=none");
        return canvas;
    };

    let (cw, ch) = canvas.dimensions();
    let (lw, lh) = recolored.dimensions();
    let placement = match template {
        Template::Default => proportional_placement(lw, lh, cw, ch, opts.scale, opts.offset),
        Template::UniformLogo => bounding_box_placement(lw, lh, cw, ch, opts),
    };
    let Some(p) = placement else {
        tracing::debug!(lw, lh, "logo placement collapsed to zero size; skipping");
        return canvas;
    };
    tracing::debug!(?template, ?p, mode = ?opts.mode, "place logo");

    let sized = if (p.width, p.height) == (lw, lh) {
        recolored
    } else {
        imageops::resize(&recolored, p.width, p.height, FilterType::Lanczos3)
    };

    let mut canvas = canvas;
    composite_onto_rgb(&mut canvas, &PremulLayer::from_straight(&sized, p.x, p.y));
    canvas
}

#[cfg(test)]
#[path = "../tests/unit/logo.rs"]
mod tests;
