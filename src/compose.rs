//! Canvas composer: runs every stage in order on a fresh 2000×3000 canvas.

use image::imageops;
use image::{DynamicImage, RgbImage};
use rand::RngCore;

use crate::effects::{apply_grain, apply_matte_fade, apply_vignette, apply_wash, resize_cover};
use crate::finish::finish_corners_and_border;
use crate::foundation::error::{PosterError, PosterResult};
use crate::logo::place_logo;
use crate::options::{EffectOptions, RenderOptions};
use crate::text::{FontLibrary, render_text_overlay};

pub const CANVAS_WIDTH: u32 = 2000;
pub const CANVAS_HEIGHT: u32 = 3000;

/// Cover-fit the background, apply the vertical shift and run the effect chain
/// (matte/fade, vignette, grain, wash).
pub fn build_base_poster(
    background: &DynamicImage,
    effects: &EffectOptions,
    rng: &mut dyn RngCore,
) -> PosterResult<RgbImage> {
    let poster = resize_cover(
        background,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        effects.poster_zoom,
    );

    let shift_px = (effects.poster_shift_y * CANVAS_HEIGHT as f32) as i64;
    let poster = if shift_px == 0 {
        poster
    } else {
        let mut base = RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        imageops::replace(&mut base, &poster, 0, shift_px);
        base
    };

    let poster = apply_matte_fade(
        poster,
        effects.matte_height_ratio,
        effects.fade_height_ratio,
    );
    let poster = apply_vignette(poster, effects.vignette_strength)?;
    let poster = apply_grain(poster, effects.grain_amount, rng)?;
    Ok(apply_wash(poster, effects.wash_strength))
}

/// Stateless poster renderer. Cheap to clone and safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct PosterRenderer {
    fonts: FontLibrary,
}

impl PosterRenderer {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Render with thread-local randomness for the grain stage.
    pub fn render(
        &self,
        background: &DynamicImage,
        logo: Option<&DynamicImage>,
        opts: &RenderOptions,
    ) -> PosterResult<RgbImage> {
        self.render_with_rng(background, logo, opts, &mut rand::thread_rng())
    }

    /// Render one poster. Only an empty background is an error; every other problem degrades
    /// to a skipped stage.
    #[tracing::instrument(skip_all, fields(template = ?opts.template))]
    pub fn render_with_rng<R: RngCore>(
        &self,
        background: &DynamicImage,
        logo: Option<&DynamicImage>,
        opts: &RenderOptions,
        rng: &mut R,
    ) -> PosterResult<RgbImage> {
        if background.width() == 0 || background.height() == 0 {
            return Err(PosterError::invalid_input(format!(
                "background image is empty ({}x{})",
                background.width(),
                background.height()
            )));
        }
        tracing::debug!(
            bg_w = background.width(),
            bg_h = background.height(),
            has_logo = logo.is_some(),
            "render poster"
        );

        let canvas = build_base_poster(background, &opts.effects, rng)?;
        let canvas = place_logo(canvas, logo, background, opts.template, &opts.logo);
        let canvas = render_text_overlay(canvas, &opts.text, &self.fonts)?;
        let finished = finish_corners_and_border(canvas, &opts.border)?;

        Ok(DynamicImage::ImageRgba8(finished).to_rgb8())
    }
}

#[cfg(test)]
#[path = "../tests/unit/compose.rs"]
mod tests;
