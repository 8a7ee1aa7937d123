//! SVG to red/black bitplanes for tri-color e-paper.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use eink_dither::{EinkDitherer, Palette, Srgb, TriColor};

use super::backend::{Placement, RasterJob};
use super::bmp;
use super::rasterizer::Rasterizer;
use crate::error::MonoError;

/// Fixed raster size of the intermediate PNG.
pub const RASTER_SIZE: u32 = 200;

/// Output paths of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanePaths {
    /// `<stem>.r.bmp`: ink where the pixel is red
    pub red: PathBuf,
    /// `<stem>.b.bmp`: ink where the pixel is black
    pub black: PathBuf,
}

impl PlanePaths {
    pub fn for_input(svg: &Path) -> Self {
        Self {
            red: svg.with_extension("r.bmp"),
            black: svg.with_extension("b.bmp"),
        }
    }
}

/// Removes the intermediate PNG when dropped.
struct TempFile(PathBuf);

impl Drop for TempFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.0) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(%e, path = %self.0.display(), "Failed to remove temporary PNG"),
        }
    }
}

/// Rasterizes SVG artwork, dithers it against black/red/white with
/// Floyd-Steinberg and writes one 1-bit BMP per ink.
pub struct Ditherer {
    rasterizer: Rasterizer,
    ditherer: EinkDitherer,
}

impl Ditherer {
    pub fn new(rasterizer: Rasterizer) -> Self {
        Self {
            rasterizer,
            ditherer: EinkDitherer::new(Palette::tricolor()),
        }
    }

    /// Replace the dithering configuration. Its palette must be
    /// [`Palette::tricolor()`] for the plane split to make sense.
    pub fn with_ditherer(mut self, ditherer: EinkDitherer) -> Self {
        self.ditherer = ditherer;
        self
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    /// Convert `svg` into `<stem>.r.bmp` and `<stem>.b.bmp` next to it.
    ///
    /// The artwork is always rasterized at 200x200; `width` and `height`
    /// are accepted for interface compatibility and ignored. The
    /// intermediate `<stem>.png` never outlives the call. A raster of another
    /// size, as some external tools produce, is fitted and centered on white.
    pub fn svg_to_mono(
        &self,
        svg: &Path,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<PlanePaths, MonoError> {
        if width.is_some() || height.is_some() {
            tracing::debug!(?width, ?height, "Requested size ignored, rendering at 200x200");
        }

        let png_path = svg.with_extension("png");
        let _cleanup = TempFile(png_path.clone());

        let job = RasterJob::new(svg, &png_path)
            .width(Some(RASTER_SIZE))
            .height(Some(RASTER_SIZE));
        self.rasterizer.rasterize(&job)?;

        let (pixels, w, h) = load_png_on_white(&png_path)?;
        let pixels = if (w, h) == (RASTER_SIZE as usize, RASTER_SIZE as usize) {
            pixels
        } else {
            tracing::debug!(width = w, height = h, "Fitting raster onto 200x200 canvas");
            fit_on_white(&pixels, w, h, RASTER_SIZE)
        };
        let size = RASTER_SIZE as usize;
        let result = self.ditherer.dither(&pixels, size, size);

        let red = result.plane(TriColor::Red.index());
        let black = result.plane(TriColor::Black.index());
        tracing::info!(
            svg = %svg.display(),
            red = red.count_on(),
            black = black.count_on(),
            "Dithered to red/black planes"
        );

        let paths = PlanePaths::for_input(svg);
        bmp::write_bitplane(&paths.red, &red)?;
        bmp::write_bitplane(&paths.black, &black)?;
        Ok(paths)
    }
}

/// Alpha over opaque white: `round((c * a + 255 * (255 - a)) / 255)`.
#[inline]
pub fn composite_on_white(c: u8, a: u8) -> u8 {
    let (c, a) = (c as u32, a as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Scale `pixels` uniformly into a white `size` x `size` canvas, centered,
/// with nearest-neighbor sampling.
pub fn fit_on_white(pixels: &[Srgb], width: usize, height: usize, size: u32) -> Vec<Srgb> {
    let white = Srgb::from_u8(255, 255, 255);
    let side = size as usize;
    if width == 0 || height == 0 {
        return vec![white; side * side];
    }

    let placement = Placement::fit(width as f32, height as f32, Some(size), Some(size));
    let mut canvas = Vec::with_capacity(side * side);
    for y in 0..side {
        let sy = ((y as f32 + 0.5 - placement.offset_y) / placement.scale).floor();
        for x in 0..side {
            let sx = ((x as f32 + 0.5 - placement.offset_x) / placement.scale).floor();
            let inside = sx >= 0.0 && sy >= 0.0 && (sx as usize) < width && (sy as usize) < height;
            canvas.push(if inside {
                pixels[sy as usize * width + sx as usize]
            } else {
                white
            });
        }
    }
    canvas
}

/// Decode a PNG of any color type and flatten it onto white.
pub fn load_png_on_white(path: &Path) -> Result<(Vec<Srgb>, usize, usize), MonoError> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let pixels: Vec<Srgb> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|p| {
                Srgb::from_u8(
                    composite_on_white(p[0], p[3]),
                    composite_on_white(p[1], p[3]),
                    composite_on_white(p[2], p[3]),
                )
            })
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|p| Srgb::from_u8(p[0], p[1], p[2]))
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|p| {
                let v = composite_on_white(p[0], p[1]);
                Srgb::from_u8(v, v, v)
            })
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&v| Srgb::from_u8(v, v, v)).collect(),
        other => return Err(MonoError::UnsupportedColor(other)),
    };

    Ok((pixels, info.width as usize, info.height as usize))
}
