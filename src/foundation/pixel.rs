use image::{RgbImage, RgbaImage};
use rayon::prelude::*;

use crate::foundation::color::Rgb8;
use crate::foundation::error::{PosterError, PosterResult};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied RGBA8 layer with an integer origin in canvas space.
#[derive(Clone, Debug)]
pub struct PremulLayer {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PremulLayer {
    pub fn transparent(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn from_straight(img: &RgbaImage, x: i64, y: i64) -> Self {
        let mut data = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut data);
        Self {
            x,
            y,
            width: img.width(),
            height: img.height(),
            data,
        }
    }

    pub fn to_straight(&self) -> RgbaImage {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        // Length matches width*height*4 by construction.
        RgbaImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Source-over `src` onto this layer; both live in the same coordinate space.
    pub fn draw_over(&mut self, src: &PremulLayer) {
        let Some(span) = overlap(self, src) else {
            return;
        };
        let dw = self.width as usize;
        let sw = src.width as usize;
        for row in 0..span.h {
            let d0 = ((span.dy + row) * dw + span.dx) * 4;
            let s0 = ((span.sy + row) * sw + span.sx) * 4;
            let d = &mut self.data[d0..d0 + span.w * 4];
            let s = &src.data[s0..s0 + span.w * 4];
            for (dp, sp) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
                let out = over([dp[0], dp[1], dp[2], dp[3]], [sp[0], sp[1], sp[2], sp[3]], 1.0);
                dp.copy_from_slice(&out);
            }
        }
    }
}

struct Span {
    dx: usize,
    dy: usize,
    sx: usize,
    sy: usize,
    w: usize,
    h: usize,
}

fn overlap(dst: &PremulLayer, src: &PremulLayer) -> Option<Span> {
    let x0 = dst.x.max(src.x);
    let y0 = dst.y.max(src.y);
    let x1 = (dst.x + i64::from(dst.width)).min(src.x + i64::from(src.width));
    let y1 = (dst.y + i64::from(dst.height)).min(src.y + i64::from(src.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Span {
        dx: (x0 - dst.x) as usize,
        dy: (y0 - dst.y) as usize,
        sx: (x0 - src.x) as usize,
        sy: (y0 - src.y) as usize,
        w: (x1 - x0) as usize,
        h: (y1 - y0) as usize,
    })
}

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over a premultiplied layer onto an opaque RGB canvas. Off-canvas parts are clipped.
pub fn composite_onto_rgb(dst: &mut RgbImage, src: &PremulLayer) {
    let (cw, ch) = dst.dimensions();
    let x0 = src.x.max(0);
    let y0 = src.y.max(0);
    let x1 = (src.x + i64::from(src.width)).min(i64::from(cw));
    let y1 = (src.y + i64::from(src.height)).min(i64::from(ch));
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let cw = cw as usize;
    let sw = src.width as usize;
    let span_w = (x1 - x0) as usize;
    let sx = (x0 - src.x) as usize;
    let first_row = y0 as usize;
    let rows = (y1 - y0) as usize;

    dst.par_chunks_mut(cw * 3)
        .skip(first_row)
        .take(rows)
        .enumerate()
        .for_each(|(i, row)| {
            let sy = (y0 - src.y) as usize + i;
            let s0 = (sy * sw + sx) * 4;
            let s = &src.data[s0..s0 + span_w * 4];
            let d = &mut row[(x0 as usize) * 3..(x0 as usize + span_w) * 3];
            for (dp, sp) in d.chunks_exact_mut(3).zip(s.chunks_exact(4)) {
                let sa = sp[3];
                if sa == 0 {
                    continue;
                }
                let inv = 255 - u16::from(sa);
                for c in 0..3 {
                    dp[c] = sp[c].saturating_add(mul_div255(u16::from(dp[c]), inv));
                }
            }
        });
}

/// Blend every pixel of `img` toward `color` by the per-pixel `mask` (0 keeps, 255 replaces).
pub fn blend_toward_masked(img: &mut RgbImage, color: Rgb8, mask: &[u8]) -> PosterResult<()> {
    let (w, h) = img.dimensions();
    if mask.len() != (w as usize) * (h as usize) {
        return Err(PosterError::render(
            "blend_toward_masked expects one mask byte per pixel",
        ));
    }
    let c = color.to_array();
    img.par_chunks_mut(3)
        .zip(mask.par_iter())
        .for_each(|(px, &m)| {
            if m == 0 {
                return;
            }
            let inv = 255 - u16::from(m);
            for i in 0..3 {
                px[i] = mul_div255(u16::from(c[i]), u16::from(m))
                    .saturating_add(mul_div255(u16::from(px[i]), inv));
            }
        });
    Ok(())
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

pub fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixel.rs"]
mod tests;
