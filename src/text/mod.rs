//! Multi-line text overlay: fonts, wrapping and rasterization.

pub mod fonts;
pub mod layout;
pub mod raster;

pub use fonts::{FontLibrary, ResolvedFont};
pub use layout::{TextBlock, TextLine, TextMeasure};
pub use raster::{TextShaper, render_text_overlay};
