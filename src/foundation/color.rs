use image::{Rgba, RgbaImage};
use serde::Serialize;

/// Opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB` or the `#RGB` shorthand (case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return None;
        }

        fn hex_byte(pair: &str) -> Option<u8> {
            u8::from_str_radix(pair, 16).ok()
        }

        match s.len() {
            6 => Some(Self::new(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            3 => {
                let nibble = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
                Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn with_alpha(self, a: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, a])
    }
}

/// Clamp that also maps NaN to `lo`.
pub fn clamp_f32(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

/// Fill every pixel of `logo` with `color`, keeping the alpha channel untouched.
///
/// Fully transparent pixels keep their alpha of zero, so no box or backdrop appears around the
/// logo shape.
pub fn solid_tint(logo: &RgbaImage, color: Rgb8) -> RgbaImage {
    let mut out = logo.clone();
    for px in out.pixels_mut() {
        let a = px[3];
        *px = color.with_alpha(a);
    }
    out
}

/// Area-average of an RGB(A) buffer down to a single pixel. Alpha is ignored.
pub fn average_color(img: &image::DynamicImage) -> Rgb8 {
    let rgb = img.to_rgb8();
    let n = u64::from(rgb.width()) * u64::from(rgb.height());
    if n == 0 {
        return Rgb8::BLACK;
    }

    let mut sum = [0u64; 3];
    for row in rgb.as_raw().chunks_exact(3) {
        sum[0] += u64::from(row[0]);
        sum[1] += u64::from(row[1]);
        sum[2] += u64::from(row[2]);
    }
    let avg = |s: u64| ((s + n / 2) / n).min(255) as u8;
    Rgb8::new(avg(sum[0]), avg(sum[1]), avg(sum[2]))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
