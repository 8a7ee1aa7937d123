//! Palette struct with precomputed color representations and
//! nearest-color matching.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{LinearRgb, Srgb};
use crate::dither::DiffusionSpace;

/// Entries of the black/red/white palette, in index order.
///
/// The discriminant is the palette index produced by dithering against
/// [`Palette::tricolor()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TriColor {
    /// Black ink (0, 0, 0)
    Black = 0,
    /// Red ink (255, 0, 0)
    Red = 1,
    /// Unprinted paper (255, 255, 255)
    White = 2,
}

impl TriColor {
    /// All entries in palette order.
    pub const ALL: [TriColor; 3] = [TriColor::Black, TriColor::Red, TriColor::White];

    /// Palette index of this entry.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The sRGB color of this entry.
    pub fn srgb(self) -> Srgb {
        match self {
            TriColor::Black => Srgb::from_u8(0, 0, 0),
            TriColor::Red => Srgb::from_u8(255, 0, 0),
            TriColor::White => Srgb::from_u8(255, 255, 255),
        }
    }
}

/// An ordered color palette.
///
/// Colors are validated once (non-empty, at most 256 entries, no
/// byte-identical duplicates) and both the sRGB and the linear
/// representation are precomputed, so per-pixel matching never converts
/// palette colors.
///
/// # Example
///
/// ```
/// use eink_dither::{Palette, Srgb};
///
/// let colors = [Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)];
/// let palette = Palette::new(&colors).unwrap();
///
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    srgb: Vec<Srgb>,
    linear: Vec<LinearRgb>,
}

impl Palette {
    /// Create a new palette from sRGB colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] if there are more than 256 colors
    /// - [`PaletteError::DuplicateColor`] if two entries have the same bytes
    pub fn new(colors: &[Srgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > 256 {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
            });
        }

        let mut seen = HashSet::new();
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(color.to_bytes()) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        // Snap to exact 8-bit values so matching against byte-exact input
        // colors produces zero error.
        let srgb: Vec<Srgb> = colors
            .iter()
            .map(|c| Srgb::from_bytes(c.to_bytes()))
            .collect();
        let linear = srgb.iter().map(|&c| LinearRgb::from(c)).collect();

        Ok(Self { srgb, linear })
    }

    /// The black/red/white palette of tri-color e-paper panels, ordered
    /// as [`TriColor::ALL`].
    pub fn tricolor() -> Self {
        let srgb: Vec<Srgb> = TriColor::ALL.iter().map(|c| c.srgb()).collect();
        let linear = srgb.iter().map(|&c| LinearRgb::from(c)).collect();
        Self { srgb, linear }
    }

    /// Create a palette from hex color strings.
    ///
    /// ```
    /// use eink_dither::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000", "#F00", "#FFF"]).unwrap();
    /// assert_eq!(palette, Palette::tricolor());
    /// ```
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .map(|s| Srgb::from_str(s))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&parsed)
    }

    /// Number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.srgb.len()
    }

    /// Always false for a constructed palette; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.srgb.is_empty()
    }

    /// sRGB color at `index`.
    #[inline]
    pub fn color(&self, index: usize) -> Srgb {
        self.srgb[index]
    }

    /// Linear color at `index`.
    #[inline]
    pub fn linear(&self, index: usize) -> LinearRgb {
        self.linear[index]
    }

    /// Color at `index` expressed in the given diffusion space.
    #[inline]
    pub fn encoded(&self, index: usize, space: DiffusionSpace) -> [f32; 3] {
        match space {
            DiffusionSpace::Srgb => self.srgb[index].to_array(),
            DiffusionSpace::Linear => self.linear[index].to_array(),
        }
    }

    /// Find the entry nearest to `pixel` (given in `space`).
    ///
    /// Distance is squared Euclidean in that space. Ties go to the lowest
    /// index so results never depend on iteration details.
    pub fn find_nearest(&self, pixel: [f32; 3], space: DiffusionSpace) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for i in 0..self.len() {
            let target = self.encoded(i, space);
            let dist = (0..3)
                .map(|c| {
                    let d = pixel[c] - target[c];
                    d * d
                })
                .sum::<f32>();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }
}
