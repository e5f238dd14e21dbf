//! Strongly typed render options.
//!
//! Callers hand the engine a flat JSON object of named parameters. [`RenderOptions::from_json`]
//! is the single place where those values are coerced, defaulted and clamped; every pipeline
//! stage afterwards reads plain typed fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foundation::color::{Rgb8, clamp_f32};

/// Logo placement strategy, selected by `template_id`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Width proportional to the canvas, centred on a vertical anchor.
    #[default]
    Default,
    /// Fit into a fixed bounding box, never upscaling.
    UniformLogo,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoMode {
    #[default]
    Stock,
    Match,
    Hex,
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    None,
    #[default]
    Uppercase,
    Lowercase,
    Capitalize,
}

/// Base poster knobs: cover-fit and the effect chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectOptions {
    pub poster_zoom: f32,
    pub poster_shift_y: f32,
    pub matte_height_ratio: f32,
    pub fade_height_ratio: f32,
    pub vignette_strength: f32,
    pub grain_amount: f32,
    pub wash_strength: f32,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            poster_zoom: 1.0,
            poster_shift_y: 0.0,
            matte_height_ratio: 0.0,
            fade_height_ratio: 0.0,
            vignette_strength: 0.0,
            grain_amount: 0.0,
            wash_strength: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogoOptions {
    pub mode: LogoMode,
    pub hex: Rgb8,
    pub scale: f32,
    pub offset: f32,
    pub box_max_w: u32,
    pub box_max_h: u32,
    pub box_offset_x: f32,
    pub box_offset_y: f32,
    pub override_enabled: bool,
    pub override_scale: Option<f32>,
    pub override_offset_y: Option<f32>,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            mode: LogoMode::Stock,
            hex: Rgb8::WHITE,
            scale: 0.5,
            offset: 0.75,
            box_max_w: 600,
            box_max_h: 240,
            box_offset_x: 0.5,
            box_offset_y: 0.78,
            override_enabled: false,
            override_scale: None,
            override_offset_y: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextOptions {
    pub enabled: bool,
    pub custom_text: String,
    pub movie_title: String,
    pub movie_year: String,
    pub font_family: String,
    pub font_size: u32,
    pub font_weight: u16,
    pub color: Rgb8,
    pub align: TextAlign,
    pub transform: TextTransform,
    pub letter_spacing: i32,
    pub line_height: f32,
    pub position_y: f32,
    pub shadow_enabled: bool,
    pub shadow_blur: u32,
    pub shadow_offset_x: i32,
    pub shadow_offset_y: i32,
    pub shadow_color: Rgb8,
    pub shadow_opacity: f32,
    pub stroke_enabled: bool,
    pub stroke_width: u32,
    pub stroke_color: Rgb8,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            custom_text: String::new(),
            movie_title: String::new(),
            movie_year: String::new(),
            font_family: "Arial".to_owned(),
            font_size: 120,
            font_weight: 700,
            color: Rgb8::WHITE,
            align: TextAlign::Center,
            transform: TextTransform::Uppercase,
            letter_spacing: 2,
            line_height: 1.2,
            position_y: 0.75,
            shadow_enabled: true,
            shadow_blur: 10,
            shadow_offset_x: 0,
            shadow_offset_y: 4,
            shadow_color: Rgb8::BLACK,
            shadow_opacity: 0.8,
            stroke_enabled: false,
            stroke_width: 4,
            stroke_color: Rgb8::BLACK,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BorderOptions {
    pub enabled: bool,
    pub width_px: u32,
    pub color: Rgb8,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            width_px: 0,
            color: Rgb8::WHITE,
        }
    }
}

/// Immutable, fully defaulted and clamped option record for one render.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderOptions {
    pub template: Template,
    pub effects: EffectOptions,
    pub logo: LogoOptions,
    pub text: TextOptions,
    pub border: BorderOptions,
}

impl RenderOptions {
    /// Build options from any JSON value. Non-objects yield the defaults.
    pub fn from_json(value: &Value) -> Self {
        match value.as_object() {
            Some(map) => Self::from_map(map),
            None => {
                tracing::debug!("render options are not a JSON object; using defaults");
                Self::default()
            }
        }
    }

    /// Build options from a flat key/value map. Unknown keys are ignored, malformed values
    /// fall back to their defaults and numeric values are clamped to their documented ranges.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let r = Reader { map };
        let d = Self::default();

        let template = match r.string("template_id").as_deref().map(str::trim) {
            Some("uniformlogo" | "uniform_logo" | "uniform-logo") => Template::UniformLogo,
            _ => Template::Default,
        };

        let effects = EffectOptions {
            poster_zoom: r.f32("poster_zoom", d.effects.poster_zoom).max(0.01),
            poster_shift_y: clamp_f32(r.f32("poster_shift_y", d.effects.poster_shift_y), -0.5, 0.5),
            matte_height_ratio: clamp_f32(
                r.f32("matte_height_ratio", d.effects.matte_height_ratio),
                0.0,
                0.5,
            ),
            fade_height_ratio: clamp_f32(
                r.f32("fade_height_ratio", d.effects.fade_height_ratio),
                0.0,
                0.5,
            ),
            vignette_strength: clamp_f32(
                r.f32("vignette_strength", d.effects.vignette_strength),
                0.0,
                1.0,
            ),
            grain_amount: clamp_f32(r.f32("grain_amount", d.effects.grain_amount), 0.0, 0.6),
            wash_strength: {
                let v = r
                    .f32_opt("wash_strength")
                    .or_else(|| r.f32_opt("v12_wash_strength"))
                    .unwrap_or(d.effects.wash_strength);
                clamp_f32(v, 0.0, 1.0)
            },
        };

        let logo_mode = match r.string("logo_mode").as_deref().map(str::trim) {
            Some("match") => LogoMode::Match,
            Some("hex") => LogoMode::Hex,
            Some("none") => LogoMode::None,
            _ => LogoMode::Stock,
        };
        let box_offset_y = clamp_f32(r.f32("uniform_logo_offset_y", d.logo.box_offset_y), 0.0, 1.0);
        let logo = LogoOptions {
            mode: logo_mode,
            hex: r.color("logo_hex", d.logo.hex),
            scale: clamp_f32(r.f32("logo_scale", d.logo.scale), 0.1, 1.0),
            offset: clamp_f32(r.f32("logo_offset", d.logo.offset), 0.0, 1.0),
            box_max_w: r.u32("uniform_logo_max_w", d.logo.box_max_w).max(1),
            box_max_h: r.u32("uniform_logo_max_h", d.logo.box_max_h).max(1),
            box_offset_x: clamp_f32(r.f32("uniform_logo_offset_x", d.logo.box_offset_x), 0.0, 1.0),
            box_offset_y,
            override_enabled: r.bool("uniform_logo_override_enabled", false),
            override_scale: r
                .f32_opt("uniform_logo_override_scale")
                .filter(|s| *s > 0.0)
                .map(|s| s.min(4.0)),
            override_offset_y: r
                .f32_opt("uniform_logo_override_offset_y")
                .map(|v| clamp_f32(v, 0.0, 1.0)),
        };

        let text = TextOptions {
            enabled: r.bool("text_overlay_enabled", d.text.enabled),
            custom_text: r.string("custom_text").unwrap_or_default(),
            movie_title: r.string("movie_title").unwrap_or_default(),
            movie_year: r.string("movie_year").unwrap_or_default(),
            font_family: r
                .string("font_family")
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.text.font_family),
            font_size: r.u32("font_size", d.text.font_size).clamp(4, 1000),
            font_weight: r.weight("font_weight", d.text.font_weight),
            color: r.color("text_color", d.text.color),
            align: match r.string("text_align").as_deref().map(str::trim) {
                Some("left") => TextAlign::Left,
                Some("right") => TextAlign::Right,
                _ => TextAlign::Center,
            },
            transform: match r.string("text_transform").as_deref().map(str::trim) {
                Some("none") => TextTransform::None,
                Some("lowercase") => TextTransform::Lowercase,
                Some("capitalize") => TextTransform::Capitalize,
                _ => TextTransform::Uppercase,
            },
            letter_spacing: r.i32("letter_spacing", d.text.letter_spacing).clamp(-50, 200),
            line_height: clamp_f32(r.f32("line_height", d.text.line_height), 0.5, 4.0),
            position_y: clamp_f32(r.f32("position_y", d.text.position_y), 0.0, 1.0),
            shadow_enabled: r.bool("shadow_enabled", d.text.shadow_enabled),
            shadow_blur: r.u32("shadow_blur", d.text.shadow_blur).min(100),
            shadow_offset_x: r.i32("shadow_offset_x", d.text.shadow_offset_x).clamp(-200, 200),
            shadow_offset_y: r.i32("shadow_offset_y", d.text.shadow_offset_y).clamp(-200, 200),
            shadow_color: r.color("shadow_color", d.text.shadow_color),
            shadow_opacity: clamp_f32(r.f32("shadow_opacity", d.text.shadow_opacity), 0.0, 1.0),
            stroke_enabled: r.bool("stroke_enabled", d.text.stroke_enabled),
            stroke_width: r.u32("stroke_width", d.text.stroke_width).min(50),
            stroke_color: r.color("stroke_color", d.text.stroke_color),
        };

        let border = BorderOptions {
            enabled: r.bool("border_enabled", d.border.enabled),
            width_px: r.u32("border_px", d.border.width_px).min(500),
            color: r.color("border_color", d.border.color),
        };

        Self {
            template,
            effects,
            logo,
            text,
            border,
        }
    }
}

/// Lenient typed reads over the raw option map.
struct Reader<'a> {
    map: &'a Map<String, Value>,
}

impl Reader<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn f64_opt(&self, key: &str) -> Option<f64> {
        let v = self.get(key)?;
        let n = match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        match n {
            Some(n) if n.is_finite() => Some(n),
            _ => {
                tracing::debug!(key, value = %v, "ignoring malformed numeric option");
                None
            }
        }
    }

    fn f32_opt(&self, key: &str) -> Option<f32> {
        self.f64_opt(key).map(|n| n as f32)
    }

    fn f32(&self, key: &str, default: f32) -> f32 {
        self.f32_opt(key).unwrap_or(default)
    }

    fn i32(&self, key: &str, default: i32) -> i32 {
        self.f64_opt(key)
            .map(|n| n.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
            .unwrap_or(default)
    }

    fn u32(&self, key: &str, default: u32) -> u32 {
        self.f64_opt(key)
            .map(|n| n.trunc().clamp(0.0, f64::from(u32::MAX)) as u32)
            .unwrap_or(default)
    }

    fn bool(&self, key: &str, default: bool) -> bool {
        let Some(v) = self.get(key) else {
            return default;
        };
        match v {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" | "" => false,
                _ => {
                    tracing::debug!(key, value = %v, "ignoring malformed boolean option");
                    default
                }
            },
            _ => default,
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn color(&self, key: &str, default: Rgb8) -> Rgb8 {
        match self.string(key) {
            Some(s) => Rgb8::from_hex(&s).unwrap_or_else(|| {
                tracing::debug!(key, value = %s, "ignoring malformed hex color option");
                default
            }),
            None => default,
        }
    }

    fn weight(&self, key: &str, default: u16) -> u16 {
        if let Some(s) = self.string(key) {
            match s.trim().to_ascii_lowercase().as_str() {
                "thin" => return 100,
                "light" => return 300,
                "normal" | "regular" => return 400,
                "medium" => return 500,
                "semibold" => return 600,
                "bold" => return 700,
                "black" | "heavy" => return 900,
                _ => {}
            }
        }
        self.f64_opt(key)
            .map(|n| n.round().clamp(100.0, 900.0) as u16)
            .unwrap_or(default)
    }
}

#[cfg(test)]
#[path = "../tests/unit/options.rs"]
mod tests;
