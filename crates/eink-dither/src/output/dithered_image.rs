//! DitheredImage struct: palette indices plus dimensions and palette.

use super::Bitplane;
use crate::palette::Palette;

/// The canonical output of the dithering pipeline.
///
/// Stores one `u8` palette index per pixel in row-major order, along with
/// image dimensions and the palette used for dithering.
///
/// # Example
///
/// ```
/// use eink_dither::{DitheredImage, Palette};
///
/// // A 2x2 result: black, red / white, black
/// let image = DitheredImage::new(vec![0, 1, 2, 0], 2, 2, Palette::tricolor());
///
/// assert_eq!(image.count(0), 2);
/// assert_eq!(image.plane(1).count_on(), 1);
/// assert_eq!(image.to_rgb()[3..6], [255, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct DitheredImage {
    /// Palette indices, one per pixel, row-major order.
    indices: Vec<u8>,
    width: usize,
    height: usize,
    /// The palette used for dithering (owned for ergonomic return values).
    palette: Palette,
}

impl DitheredImage {
    /// Create a new `DitheredImage` from dithered palette indices.
    ///
    /// Each index must be in `0..palette.len()`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{}={})",
            indices.len(),
            width,
            height,
            width * height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index of the pixel at `(x, y)`.
    #[inline]
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        self.indices[y * self.width + x]
    }

    /// Number of pixels assigned palette entry `index`.
    pub fn count(&self, index: u8) -> usize {
        self.indices.iter().filter(|&&i| i == index).count()
    }

    /// Extract the plane of pixels whose class is exactly `index`.
    ///
    /// Planes for different indices never overlap, and together the planes
    /// of all indices cover every pixel once.
    pub fn plane(&self, index: u8) -> Bitplane {
        let bits = self.indices.iter().map(|&i| i == index).collect();
        Bitplane::new(bits, self.width, self.height)
    }

    /// Convert to RGB bytes by looking up palette colors.
    ///
    /// Flat `[R, G, B, R, G, B, ...]` buffer of length `width * height * 3`.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.color(idx as usize).to_bytes());
        }
        rgb
    }
}
