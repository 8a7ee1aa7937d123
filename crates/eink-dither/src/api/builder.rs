//! EinkDitherer builder -- the primary ergonomic entry point for the crate.

use crate::color::Srgb;
use crate::dither::{DiffusionSpace, DitherAlgorithm, DitherOptions};
use crate::output::DitheredImage;
use crate::palette::Palette;

use super::DitherError;

/// High-level dithering builder for e-ink displays.
///
/// # Design
///
/// - Constructor requires [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self` (standard builder pattern)
/// - [`dither()`](Self::dither) takes `&self` so the builder is **reusable**
///   across multiple images
///
/// Defaults: Floyd-Steinberg, raster order (no serpentine), sRGB diffusion,
/// pixel values clamped to `0.0..=1.0`.
///
/// # Example
///
/// ```
/// use eink_dither::{DiffusionSpace, EinkDitherer, Palette, Srgb};
///
/// let ditherer = EinkDitherer::new(Palette::tricolor())
///     .diffusion_space(DiffusionSpace::Linear);
///
/// let pixels = vec![Srgb::from_u8(128, 128, 128); 4];
/// let result = ditherer.dither(&pixels, 2, 2);
///
/// assert_eq!(result.width(), 2);
/// assert_eq!(result.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EinkDitherer {
    palette: Palette,
    dither_opts: DitherOptions,
    algorithm: DitherAlgorithm,
}

impl EinkDitherer {
    /// Create a new ditherer with the given palette and default options.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            dither_opts: DitherOptions::default(),
            algorithm: DitherAlgorithm::default(),
        }
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.dither_opts = self.dither_opts.serpentine(enabled);
        self
    }

    /// Set error clamping threshold.
    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.dither_opts = self.dither_opts.error_clamp(clamp);
        self
    }

    /// Set the color space used for matching and error diffusion.
    #[inline]
    pub fn diffusion_space(mut self, space: DiffusionSpace) -> Self {
        self.dither_opts = self.dither_opts.diffusion_space(space);
        self
    }

    /// Set the dithering algorithm.
    ///
    /// ```
    /// use eink_dither::{DitherAlgorithm, EinkDitherer, Palette};
    ///
    /// let ditherer = EinkDitherer::new(Palette::tricolor())
    ///     .algorithm(DitherAlgorithm::Nearest);
    /// ```
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Dither raw sRGB pixels into a [`DitheredImage`].
    ///
    /// `pixels` must hold `width * height` values in row-major order; use
    /// [`dither_rgb8()`](Self::dither_rgb8) for a checked byte interface.
    pub fn dither(&self, pixels: &[Srgb], width: usize, height: usize) -> DitheredImage {
        let indices =
            self.algorithm
                .ditherer()
                .dither(pixels, width, height, &self.palette, &self.dither_opts);
        DitheredImage::new(indices, width, height, self.palette.clone())
    }

    /// Dither packed 8-bit RGB bytes (`[R, G, B, R, G, B, ...]`).
    ///
    /// # Errors
    ///
    /// [`DitherError::DimensionMismatch`] if `rgb.len() != width * height * 3`.
    pub fn dither_rgb8(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
    ) -> Result<DitheredImage, DitherError> {
        let expected = width * height * 3;
        if rgb.len() != expected {
            return Err(DitherError::DimensionMismatch {
                expected,
                actual: rgb.len(),
            });
        }
        let pixels: Vec<Srgb> = rgb
            .chunks_exact(3)
            .map(|p| Srgb::from_u8(p[0], p[1], p[2]))
            .collect();
        Ok(self.dither(&pixels, width, height))
    }
}
