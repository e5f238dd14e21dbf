//! Base-poster stages. Each takes ownership of the canvas and returns the processed one.

pub mod blur;
pub mod grain;
pub mod matte;
pub mod resize;
pub mod vignette;
pub mod wash;

pub use grain::apply_grain;
pub use matte::apply_matte_fade;
pub use resize::resize_cover;
pub use vignette::apply_vignette;
pub use wash::apply_wash;
