//! Linear RGB color type
//!
//! Linear RGB is the space where light addition is physically accurate.

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB color space.
///
/// Values represent light intensity proportional to physical light power.
/// They are typically in `0.0..=1.0` but may leave that range while error
/// is being accumulated during dithering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f32,
    /// Green channel (linear light intensity)
    pub g: f32,
    /// Blue channel (linear light intensity)
    pub b: f32,
}

impl LinearRgb {
    /// Create a new LinearRgb color from linear RGB values.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Channels as an `[r, g, b]` array.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Srgb> for LinearRgb {
    /// Gamma-decode through the lookup table.
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}
