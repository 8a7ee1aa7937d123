//! Palette types and utilities
//!
//! [`Palette`] holds a validated, ordered set of display colors; the order
//! defines the index space of dithered output. [`TriColor`] names the
//! entries of the black/red/white palette used by tri-color e-paper panels.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, TriColor};
