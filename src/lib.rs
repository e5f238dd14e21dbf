//! Postercraft renders cinematic movie posters.
//!
//! A render takes a decoded background, an optional logo and a flat JSON option map, and
//! produces one 2000×3000 RGB image:
//!
//! - cover-fit the background (zoom, vertical shift)
//! - matte/fade, vignette, grain and wash
//! - recolor and place the logo
//! - draw the wrapped text overlay
//! - round the corners and trace an optional border
//!
//! [`PosterRenderer`] runs the whole pipeline; each stage is also exported as a free function.
#![forbid(unsafe_code)]

pub mod compose;
pub mod effects;
pub mod finish;
pub mod foundation;
pub mod logo;
pub mod options;
pub mod svg;
pub mod text;

pub use crate::compose::{CANVAS_HEIGHT, CANVAS_WIDTH, PosterRenderer, build_base_poster};
pub use crate::effects::{apply_grain, apply_matte_fade, apply_vignette, apply_wash, resize_cover};
pub use crate::finish::finish_corners_and_border;
pub use crate::foundation::color::Rgb8;
pub use crate::foundation::error::{PosterError, PosterResult};
pub use crate::logo::place_logo;
pub use crate::options::{
    BorderOptions, EffectOptions, LogoMode, LogoOptions, RenderOptions, Template, TextAlign,
    TextOptions, TextTransform,
};
pub use crate::text::{FontLibrary, render_text_overlay};
