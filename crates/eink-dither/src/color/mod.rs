//! Color types and conversion utilities
//!
//! Type-safe color handling with a compile-time distinction between
//! gamma-encoded sRGB and linear light.
//!
//! # Example
//!
//! ```
//! use eink_dither::{Srgb, LinearRgb};
//!
//! let srgb = Srgb::from_u8(128, 64, 32);
//! let linear = LinearRgb::from(srgb);
//! let back = Srgb::from(linear);
//! assert!(back.to_bytes()[0].abs_diff(128) <= 1);
//! ```

mod linear_rgb;
mod lut;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use srgb::Srgb;
