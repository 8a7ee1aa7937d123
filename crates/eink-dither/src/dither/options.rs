//! Dithering options and configuration.

use crate::color::{LinearRgb, Srgb};

/// Color space in which quantization error is computed and diffused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffusionSpace {
    /// Gamma-encoded sRGB values, the way classic image tools quantize
    /// against a palette.
    #[default]
    Srgb,
    /// Linear light, so diffused error adds up as physical brightness.
    Linear,
}

impl DiffusionSpace {
    /// Express an sRGB pixel in this space.
    #[inline]
    pub fn encode(self, color: Srgb) -> [f32; 3] {
        match self {
            DiffusionSpace::Srgb => color.to_array(),
            DiffusionSpace::Linear => LinearRgb::from(color).to_array(),
        }
    }
}

/// Configuration options for error diffusion dithering.
///
/// # Defaults
///
/// - Serpentine scanning: disabled (plain raster order)
/// - Error clamp: 0.0 (pixel plus error stays within `0.0..=1.0`)
/// - Diffusion space: [`DiffusionSpace::Srgb`]
///
/// # Example
///
/// ```
/// use eink_dither::{DiffusionSpace, DitherOptions};
///
/// let options = DitherOptions::new()
///     .serpentine(true)
///     .diffusion_space(DiffusionSpace::Linear);
/// assert!(options.serpentine);
/// ```
#[derive(Debug, Clone)]
pub struct DitherOptions {
    /// Alternate the scan direction on odd rows, mirroring the kernel.
    ///
    /// Default: `false`
    pub serpentine: bool,

    /// How far (per channel) a pixel plus accumulated error may leave the
    /// `0.0..=1.0` range before being clamped.
    ///
    /// Default: `0.0`
    pub error_clamp: f32,

    /// Space used for matching and error arithmetic.
    ///
    /// Default: [`DiffusionSpace::Srgb`]
    pub space: DiffusionSpace,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            serpentine: false,
            error_clamp: 0.0,
            space: DiffusionSpace::Srgb,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// Set error clamping threshold. Negative values are treated as 0.
    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp.max(0.0);
        self
    }

    /// Set the diffusion space.
    #[inline]
    pub fn diffusion_space(mut self, space: DiffusionSpace) -> Self {
        self.space = space;
        self
    }
}
