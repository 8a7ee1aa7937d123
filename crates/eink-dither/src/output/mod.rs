//! Output types for the dithering pipeline.
//!
//! [`DitheredImage`] is the canonical result of dithering: one palette index
//! per pixel. [`Bitplane`] is a 1-bit view of it, selecting the pixels that
//! were assigned one particular palette entry (one ink of the display).

mod bitplane;
mod dithered_image;

pub use bitplane::Bitplane;
pub use dithered_image::DitheredImage;
