//! Text preparation, wrapping and block metrics.
//!
//! Everything here is independent of the glyph backend: widths come from a [`TextMeasure`],
//! so wrapping can be driven by real shaping or by a fixed-advance stub.

use crate::options::TextTransform;

/// Fixed horizontal margin on each side of the canvas.
pub const TEXT_MARGIN_PX: u32 = 100;

/// Pixel metrics for a single line of text.
pub trait TextMeasure {
    /// Returns `(advance_width, line_height)` in pixels, letter spacing included.
    fn measure(&mut self, text: &str) -> (f32, f32);

    fn width(&mut self, text: &str) -> f32 {
        self.measure(text).0
    }
}

/// Substitute `{title}`/`{year}` then apply the case transform.
pub fn prepare_text(raw: &str, title: &str, year: &str, transform: TextTransform) -> String {
    let text = raw.replace("{title}", title).replace("{year}", year);
    apply_transform(&text, transform)
}

pub fn apply_transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_owned(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => title_case(text),
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Wrap one explicit line to `max_width`.
///
/// Greedy over space-separated words. A word that cannot fit on a line of its own is broken
/// character by character, so wrapping always terminates with every multi-character line
/// within `max_width`. An empty line stays one empty line.
pub fn wrap_line(line: &str, max_width: f32, measure: &mut dyn TextMeasure) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    if measure.width(line) <= max_width {
        return vec![line.to_owned()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if measure.width(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if measure.width(word) <= max_width {
            current = word.to_owned();
        } else {
            current = break_word(word, max_width, measure, &mut out);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Emit full chunks of `word` into `out` and return the trailing partial chunk.
fn break_word(
    word: &str,
    max_width: f32,
    measure: &mut dyn TextMeasure,
    out: &mut Vec<String>,
) -> String {
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if measure.width(&current) > max_width && current.chars().count() > 1 {
            current.pop();
            out.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    current
}

/// Split on explicit newlines and wrap each line.
pub fn wrap_text(text: &str, max_width: f32, measure: &mut dyn TextMeasure) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_line(line.trim_end_matches('\r'), max_width, measure))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
    pub height: f32,
}

/// Wrapped, measured lines plus the extra gap inserted between consecutive lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub gap: f32,
}

impl TextBlock {
    pub fn layout(
        text: &str,
        max_width: f32,
        font_size: f32,
        line_height: f32,
        measure: &mut dyn TextMeasure,
    ) -> Self {
        let lines = wrap_text(text, max_width, measure)
            .into_iter()
            .map(|text| {
                let (width, height) = measure.measure(&text);
                TextLine {
                    text,
                    width,
                    height,
                }
            })
            .collect();
        Self {
            lines,
            gap: (font_size * (line_height - 1.0)).trunc(),
        }
    }

    /// Sum of line heights plus one gap between each pair of lines.
    pub fn height(&self) -> f32 {
        let lines: f32 = self.lines.iter().map(|l| l.height).sum();
        lines + self.gap * self.lines.len().saturating_sub(1) as f32
    }

    pub fn width(&self) -> f32 {
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }

    /// Top edge of every line when the block is vertically centred on `center_y`.
    pub fn line_tops(&self, center_y: f32) -> Vec<f32> {
        let mut y = (center_y - self.height() / 2.0).trunc();
        self.lines
            .iter()
            .map(|l| {
                let top = y;
                y += l.height + self.gap;
                top
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
