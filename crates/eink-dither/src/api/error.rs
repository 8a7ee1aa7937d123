//! Unified error type for the eink-dither public API.

use crate::palette::{PaletteError, ParseColorError};
use std::fmt;

/// Unified error type for the eink-dither public API.
///
/// Wraps all error types from the crate into a single enum for
/// convenient `?` propagation in application code.
///
/// # Example
///
/// ```
/// use eink_dither::{DitherError, Palette};
///
/// fn create_palette() -> Result<Palette, DitherError> {
///     let palette = Palette::from_hex(&["#000000", "#FF0000", "#FFFFFF"])?;
///     Ok(palette)
/// }
/// # assert!(create_palette().is_ok());
/// ```
#[derive(Debug)]
pub enum DitherError {
    /// Palette validation error (empty, too large, duplicate, or parse error)
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
    /// Pixel buffer length does not match the given dimensions
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
            DitherError::ParseColor(err) => write!(f, "color parse error: {}", err),
            DitherError::DimensionMismatch { expected, actual } => write!(
                f,
                "pixel buffer has {} bytes, dimensions require {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            DitherError::ParseColor(err) => Some(err),
            DitherError::DimensionMismatch { .. } => None,
        }
    }
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}

impl From<ParseColorError> for DitherError {
    fn from(err: ParseColorError) -> Self {
        DitherError::ParseColor(err)
    }
}
