//! Glyph shaping with parley and rasterization with vello_cpu.

use std::borrow::Cow;

use image::RgbImage;

use crate::effects::blur::{blur_rgba8_premul, radius_for_sigma};
use crate::foundation::color::Rgb8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::pixel::{PremulLayer, composite_onto_rgb};
use crate::options::{TextAlign, TextOptions};
use crate::text::fonts::{FontLibrary, ResolvedFont};
use crate::text::layout::{TEXT_MARGIN_PX, TextBlock, TextMeasure, prepare_text};

/// RGBA8 brush carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextBrushRgba8 {
    fn from_rgb(c: Rgb8, a: u8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a,
        }
    }

    fn to_color(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Parley shaping state bound to one resolved face and style.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
    weight: f32,
    letter_spacing: f32,
}

impl TextShaper {
    pub fn new(
        font: &ResolvedFont,
        size_px: f32,
        weight: u16,
        letter_spacing: f32,
    ) -> PosterResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::render("text size must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.data.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PosterError::render("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::render("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font.data.to_vec()),
                font.index,
            ),
            size_px,
            weight: f32::from(weight),
            letter_spacing,
        })
    }

    pub fn shape(&mut self, text: &str, brush: TextBrushRgba8) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(self.weight),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            self.letter_spacing,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMeasure for TextShaper {
    /// Width excludes the letter spacing parley appends after the last glyph.
    fn measure(&mut self, text: &str) -> (f32, f32) {
        let layout = self.shape(text, TextBrushRgba8::default());
        let width = if text.is_empty() {
            layout.width()
        } else {
            (layout.width() - self.letter_spacing).max(0.0)
        };
        (width, layout.height())
    }
}

/// Outline drawn beneath the fill.
#[derive(Clone, Copy, Debug)]
struct StrokeStyle {
    brush: TextBrushRgba8,
    width_px: f32,
}

/// Rasterize a laid-out line into a layer of `width`×`height` whose origin is `(x, y)` in canvas
/// space, with the layout's top-left at `(pad, pad)` inside the layer.
fn rasterize_layout(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    stroke: Option<StrokeStyle>,
    (x, y): (i64, i64),
    (width, height): (u32, u32),
    pad: u32,
) -> PosterResult<PremulLayer> {
    let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(PosterError::render(format!(
                "text layer {width}x{height} exceeds rasterizer limits"
            )));
        }
    };

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(pad),
        f64::from(pad),
    )));

    if let Some(s) = stroke {
        ctx.set_paint(s.brush.to_color());
        // kurbo strokes are centred on the outline; double it to extend `width_px` outward.
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(s.width_px) * 2.0));
        draw_glyph_runs(&mut ctx, layout, font, GlyphPass::Stroke);
    }
    draw_glyph_runs(&mut ctx, layout, font, GlyphPass::Fill);

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(PremulLayer {
        x,
        y,
        width,
        height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum GlyphPass {
    Fill,
    Stroke,
}

fn draw_glyph_runs(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    pass: GlyphPass,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            if pass == GlyphPass::Fill {
                ctx.set_paint(run.style().brush.to_color());
            }
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx.glyph_run(font).font_size(run.run().font_size());
            match pass {
                GlyphPass::Fill => builder.fill_glyphs(glyphs),
                GlyphPass::Stroke => builder.stroke_glyphs(glyphs),
            }
        }
    }
}

/// Draw the configured text block onto `canvas`.
///
/// Returns the canvas unchanged when text is disabled, blank after substitution, or no font
/// face is available.
pub fn render_text_overlay(
    canvas: RgbImage,
    opts: &TextOptions,
    fonts: &FontLibrary,
) -> PosterResult<RgbImage> {
    if !opts.enabled || opts.custom_text.trim().is_empty() {
        return Ok(canvas);
    }
    let text = prepare_text(
        &opts.custom_text,
        &opts.movie_title,
        &opts.movie_year,
        opts.transform,
    );
    if text.trim().is_empty() {
        tracing::debug!("text overlay blank after substitution; skipping");
        return Ok(canvas);
    }

    let Some(font) = fonts.resolve(&opts.font_family, opts.font_weight) else {
        tracing::warn!(family = %opts.font_family, "no fonts available; skipping text overlay");
        return Ok(canvas);
    };

    let (cw, ch) = canvas.dimensions();
    let font_size = opts.font_size as f32;
    let mut shaper = TextShaper::new(
        &font,
        font_size,
        opts.font_weight,
        opts.letter_spacing as f32,
    )?;

    let max_width = cw.saturating_sub(2 * TEXT_MARGIN_PX) as f32;
    let block = TextBlock::layout(&text, max_width, font_size, opts.line_height, &mut shaper);
    let tops = block.line_tops(ch as f32 * opts.position_y);
    tracing::debug!(
        text = %text,
        family = %font.family,
        lines = block.lines.len(),
        block_width = block.width(),
        block_height = block.height(),
        "render text overlay"
    );

    // Full blur kernel plus shadow offset and outline.
    let shadow_reach = radius_for_sigma(opts.shadow_blur as f32)
        + opts.shadow_offset_x.unsigned_abs()
        + opts.shadow_offset_y.unsigned_abs();
    let pad = shadow_reach + opts.stroke_width + 50;

    // Canvas-space layer, clipped vertically to the canvas plus padding.
    let block_top = tops.first().copied().unwrap_or(0.0) as i64;
    let y0 = (block_top - i64::from(pad)).max(-i64::from(pad));
    let y1 = (block_top + block.height().ceil() as i64 + i64::from(pad))
        .min(i64::from(ch) + i64::from(pad));
    let mut text_layer = PremulLayer::transparent(
        -i64::from(pad),
        y0,
        cw + 2 * pad,
        u32::try_from((y1 - y0).max(1)).unwrap_or(1),
    );

    let fill = TextBrushRgba8::from_rgb(opts.color, 255);
    let stroke = (opts.stroke_enabled && opts.stroke_width > 0).then(|| StrokeStyle {
        brush: TextBrushRgba8::from_rgb(opts.stroke_color, 255),
        width_px: opts.stroke_width as f32,
    });
    let shadow_alpha = (255.0 * opts.shadow_opacity) as u8;
    let shadow_brush = TextBrushRgba8::from_rgb(opts.shadow_color, shadow_alpha);

    for (line, top) in block.lines.iter().zip(tops) {
        if line.text.trim().is_empty() {
            continue;
        }
        let x = match opts.align {
            TextAlign::Center => ((cw as f32 - line.width) / 2.0).floor() as i64,
            TextAlign::Right => (cw as f32 - line.width) as i64 - i64::from(TEXT_MARGIN_PX),
            TextAlign::Left => i64::from(TEXT_MARGIN_PX),
        };
        let y = top as i64;
        let size = (
            line.width.ceil() as u32 + 2 * pad,
            line.height.ceil() as u32 + 2 * pad,
        );
        let (lx, ly) = (x - i64::from(pad), y - i64::from(pad));

        if opts.shadow_enabled && opts.shadow_blur > 0 {
            let layout = shaper.shape(&line.text, shadow_brush);
            let shadow_stroke = stroke.map(|s| StrokeStyle {
                brush: shadow_brush,
                ..s
            });
            let mut shadow = rasterize_layout(
                &layout,
                &shaper.font,
                shadow_stroke,
                (
                    lx + i64::from(opts.shadow_offset_x),
                    ly + i64::from(opts.shadow_offset_y),
                ),
                size,
                pad,
            )?;
            shadow.data =
                blur_rgba8_premul(&shadow.data, shadow.width, shadow.height, opts.shadow_blur as f32)?;
            text_layer.draw_over(&shadow);
        }

        let layout = shaper.shape(&line.text, fill);
        let glyphs = rasterize_layout(&layout, &shaper.font, stroke, (lx, ly), size, pad)?;
        text_layer.draw_over(&glyphs);
    }

    let mut canvas = canvas;
    composite_onto_rgb(&mut canvas, &text_layer);
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
