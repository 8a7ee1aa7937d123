//! Error diffusion dithering.
//!
//! # Algorithms
//!
//! - **Floyd-Steinberg**: the classic 4-neighbor kernel, 100% error
//!   propagation. Used for tri-color artwork.
//! - **Nearest**: plain nearest-color mapping with no diffusion, for input
//!   that already consists of palette colors.
//!
//! # Architecture
//!
//! All algorithms implement the [`Dither`] trait and share one diffusion
//! loop, [`dither_with_kernel`], parameterized by a [`Kernel`].
//! Configuration is done via [`DitherOptions`].

mod floyd_steinberg;
mod kernel;
mod nearest;
mod options;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::*;
pub use nearest::Nearest;
pub use options::{DiffusionSpace, DitherOptions};

use crate::color::Srgb;
use crate::palette::Palette;

/// Dither algorithm selection for the builder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg error diffusion (100% propagation).
    #[default]
    FloydSteinberg,

    /// Nearest palette color, no error diffusion.
    Nearest,
}

impl DitherAlgorithm {
    /// The implementation behind this selection.
    pub fn ditherer(self) -> &'static dyn Dither {
        match self {
            DitherAlgorithm::FloydSteinberg => &FloydSteinberg,
            DitherAlgorithm::Nearest => &Nearest,
        }
    }
}

/// Trait for error diffusion dithering algorithms.
///
/// Error diffusion works by:
/// 1. For each pixel, find the nearest palette color
/// 2. Compute the quantization error (desired - actual)
/// 3. Distribute that error to neighboring unprocessed pixels
pub trait Dither {
    /// Dither an image to palette indices.
    ///
    /// `image` is row-major sRGB with `width * height` pixels. Returns one
    /// palette index per pixel in the same order.
    fn dither(
        &self,
        image: &[Srgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8>;
}

/// Sliding window of error rows.
///
/// Only the rows the kernel can reach are stored (`max_dy + 1`), so memory
/// does not grow with image height.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, etc.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a buffer for `width` pixels and `row_depth` rows.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1)).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to pixel `x` of the row `row_offset` rows below.
    ///
    /// Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Move to the next row, recycling the finished row as the new last row.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Clamp a channel carrying accumulated error to
/// `[-max_error, 1.0 + max_error]`.
#[inline]
pub(crate) fn clamp_channel(value: f32, max_error: f32) -> f32 {
    value.clamp(-max_error, 1.0 + max_error)
}

/// Core error diffusion loop parameterized by kernel.
///
/// Pixels are visited in raster order (or serpentine order when enabled,
/// with the kernel mirrored on reverse rows). Each pixel plus its
/// accumulated error is clamped, matched to the nearest palette entry in
/// the configured [`DiffusionSpace`], and the residual is spread to
/// unvisited neighbors according to the kernel weights.
pub(crate) fn dither_with_kernel(
    image: &[Srgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    debug_assert_eq!(image.len(), width * height);

    let mut output = vec![0u8; width * height];
    let space = options.space;
    let divisor = kernel.divisor as f32;
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;

            let source = space.encode(image[idx]);
            let accumulated = error_buf.get_accumulated(x);
            let pixel = [
                clamp_channel(source[0] + accumulated[0], options.error_clamp),
                clamp_channel(source[1] + accumulated[1], options.error_clamp),
                clamp_channel(source[2] + accumulated[2], options.error_clamp),
            ];

            let nearest = palette.find_nearest(pixel, space);
            output[idx] = nearest as u8;

            let target = palette.encoded(nearest, space);
            let error = [
                pixel[0] - target[0],
                pixel[1] - target[1],
                pixel[2] - target[2],
            ];
            if error == [0.0; 3] {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;

                if nx >= 0 && (nx as usize) < width && y + (dy as usize) < height {
                    let w = weight as f32 / divisor;
                    error_buf.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * w, error[1] * w, error[2] * w],
                    );
                }
            }
        }

        error_buf.advance_row();
    }

    output
}
