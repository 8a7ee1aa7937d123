//! eink-dither: error diffusion dithering for tri-color e-paper displays
//!
//! This crate quantizes continuous-tone sRGB images against a small fixed
//! palette and splits the result into per-ink bitplanes, the format expected
//! by black/red/white e-paper panels that are driven one ink at a time.
//!
//! # Quick Start
//!
//! The [`EinkDitherer`] builder is the primary entry point:
//!
//! ```
//! use eink_dither::{EinkDitherer, Palette, Srgb, TriColor};
//!
//! let ditherer = EinkDitherer::new(Palette::tricolor());
//! let pixels = vec![Srgb::from_u8(255, 0, 0); 4];
//! let result = ditherer.dither(&pixels, 2, 2);
//!
//! let red = result.plane(TriColor::Red.index());
//! assert_eq!(red.count_on(), 4);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! sRGB pixels (alpha already composited onto white)
//!     |
//!     v
//! diffusion space          (sRGB as-is, or linear light via gamma LUT)
//!     |
//!     v
//! ╔═══════════════════════════════════════════╗
//! ║  pixel + accumulated error, clamped       ║
//! ║      |                                    ║
//! ║  nearest palette entry (squared distance, ║
//! ║  ties resolved to the lowest index)       ║
//! ║      |                                    ║
//! ║  error = pixel - palette[idx]             ║
//! ║      |                                    ║
//! ║  diffuse error to neighbors (kernel)      ║
//! ╚═══════════════════════════════════════════╝
//!     |
//!     v
//! DitheredImage (one palette index per pixel)
//!     |
//!     +---> Bitplane for red ink
//!     +---> Bitplane for black ink
//! ```
//!
//! # Color Spaces
//!
//! - [`Srgb`]: gamma-encoded input/output values, and the default space for
//!   error diffusion, as in classic palette quantizers.
//! - [`LinearRgb`]: physical light intensity. Selecting
//!   [`DiffusionSpace::Linear`] diffuses error as light.
//!
//! The whole pipeline is deterministic: the same input always yields the
//! same indices, bit for bit.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;


pub use api::{DitherError, EinkDitherer};
pub use color::{LinearRgb, Srgb};
pub use dither::{DiffusionSpace, DitherAlgorithm, DitherOptions};
pub use output::{Bitplane, DitheredImage};
pub use palette::{Palette, PaletteError, ParseColorError, TriColor};
