//! Floyd-Steinberg error diffusion dithering algorithm.

use crate::color::Srgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion dithering.
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// Colors the palette cannot reproduce turn into a scattered mix of the
/// nearest entries whose dot density approximates the original tone.
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        image: &[Srgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(image, width, height, palette, &FLOYD_STEINBERG, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::DiffusionSpace;

    fn black_white() -> Palette {
        Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap()
    }

    #[test]
    fn test_mid_grey_mixes_black_and_white() {
        let palette = black_white();
        let image = vec![Srgb::from_u8(128, 128, 128); 16];

        let result = FloydSteinberg.dither(&image, 4, 4, &palette, &DitherOptions::new());

        let white = result.iter().filter(|&&x| x == 1).count();
        assert!(white > 0 && white < 16, "expected a mix, got {white} white");
    }

    #[test]
    fn test_average_brightness_is_preserved() {
        let palette = black_white();
        let (width, height) = (20, 20);
        let level = 0.3_f32;
        let image = vec![Srgb::new(level, level, level); width * height];

        let result = FloydSteinberg.dither(&image, width, height, &palette, &DitherOptions::new());

        let white_ratio =
            result.iter().filter(|&&x| x == 1).count() as f32 / (width * height) as f32;
        assert!(
            (white_ratio - level).abs() < 0.05,
            "expected ~{level} white ratio, got {white_ratio}"
        );
    }

    #[test]
    fn test_palette_colors_are_exact() {
        let palette = Palette::tricolor();
        for (i, color) in [
            Srgb::from_u8(0, 0, 0),
            Srgb::from_u8(255, 0, 0),
            Srgb::from_u8(255, 255, 255),
        ]
        .into_iter()
        .enumerate()
        {
            for space in [DiffusionSpace::Srgb, DiffusionSpace::Linear] {
                let options = DitherOptions::new().diffusion_space(space);
                let result = FloydSteinberg.dither(&vec![color; 9], 3, 3, &palette, &options);
                assert!(
                    result.iter().all(|&x| x as usize == i),
                    "uniform palette color {i} must stay exact in {space:?}"
                );
            }
        }
    }

    #[test]
    fn test_serpentine_changes_pattern() {
        let palette = black_white();
        let image: Vec<Srgb> = (0..64)
            .map(|i| {
                let v = (i * 4) as u8;
                Srgb::from_u8(v, v, v)
            })
            .collect();

        let flat = FloydSteinberg.dither(&image, 8, 8, &palette, &DitherOptions::new());
        let serp = FloydSteinberg.dither(
            &image,
            8,
            8,
            &palette,
            &DitherOptions::new().serpentine(true),
        );

        assert_eq!(flat.len(), serp.len());
        assert!(flat.iter().chain(serp.iter()).all(|&x| x < 2));
    }
}
