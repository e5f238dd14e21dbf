pub mod color;
pub mod error;
pub mod pixel;
