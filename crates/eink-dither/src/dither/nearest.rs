//! Nearest palette color without error diffusion.

use crate::color::Srgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, NEAREST};

/// Maps every pixel to its nearest palette entry independently.
pub struct Nearest;

impl Dither for Nearest {
    fn dither(
        &self,
        image: &[Srgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(image, width, height, palette, &NEAREST, options)
    }
}
