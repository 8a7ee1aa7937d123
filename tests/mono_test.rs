//! Tests for SVG to red/black bitplane conversion.

mod common;

use common::fixtures::{self, svgs};
use common::{FakeBackend, Outcome};
use epaper_tools::error::MonoError;
use epaper_tools::rendering::{Ditherer, PlanePaths, Rasterizer};
use pretty_assertions::assert_eq;

fn solid(rgba: [u8; 4]) -> Ditherer {
    Ditherer::new(Rasterizer::new(vec![
        FakeBackend::new("solid", Outcome::Solid(rgba)).boxed()
    ]))
}

#[test]
fn test_png_removed_and_planes_written() {
    let dir = tempfile::tempdir().unwrap();
    let svg = fixtures::write_svg(dir.path(), "img_logo.svg", svgs::PURE_RED);

    let paths = solid([0, 0, 0, 255]).svg_to_mono(&svg, None, None).unwrap();

    assert_eq!(paths, PlanePaths::for_input(&svg));
    assert_eq!(paths.red, dir.path().join("img_logo.r.bmp"));
    assert!(paths.red.is_file());
    assert!(paths.black.is_file());
    assert!(!dir.path().join("img_logo.png").exists());
}

#[test]
fn test_pure_red_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let svg = fixtures::write_svg(dir.path(), "red.svg", svgs::PURE_RED);

    let paths = solid([255, 0, 0, 255]).svg_to_mono(&svg, None, None).unwrap();
    let red = common::read_bmp(&paths.red);
    let black = common::read_bmp(&paths.black);

    assert_eq!((red.width, red.height), (200, 200));
    assert_eq!(red.count(), 200 * 200);
    assert_eq!(black.count(), 0);
}

#[test]
fn test_transparent_becomes_white() {
    let dir = tempfile::tempdir().unwrap();
    let svg = fixtures::write_svg(dir.path(), "empty.svg", svgs::PURE_RED);

    let paths = solid([0, 0, 0, 0]).svg_to_mono(&svg, None, None).unwrap();

    assert_eq!(common::read_bmp(&paths.red).count(), 0);
    assert_eq!(common::read_bmp(&paths.black).count(), 0);
}

#[test]
fn test_requested_size_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let svg = fixtures::write_svg(dir.path(), "a.svg", svgs::PURE_RED);

    let paths = solid([0, 0, 0, 255])
        .svg_to_mono(&svg, Some(64), Some(32))
        .unwrap();
    let black = common::read_bmp(&paths.black);

    assert_eq!((black.width, black.height), (200, 200));
    assert_eq!(black.count(), 200 * 200);
}

#[test]
fn test_off_size_raster_is_fitted_and_centered() {
    let dir = tempfile::tempdir().unwrap();
    let svg = fixtures::write_svg(dir.path(), "wide.svg", svgs::HALF_AND_HALF);
    let ditherer = Ditherer::new(Rasterizer::new(vec![FakeBackend::new(
        "fit-inside",
        Outcome::Sized(200, 100, [0, 0, 0, 255]),
    )
    .boxed()]));

    let paths = ditherer.svg_to_mono(&svg, None, None).unwrap();
    let black = common::read_bmp(&paths.black);

    assert_eq!((black.width, black.height), (200, 200));
    assert_eq!(black.count(), 200 * 100);
    assert!(!black.at(0, 49) && black.at(0, 50));
    assert!(black.at(199, 149) && !black.at(199, 150));
    assert_eq!(common::read_bmp(&paths.red).count(), 0);
}

#[test]
fn test_rasterization_failure_leaves_no_png() {
    let dir = tempfile::tempdir().unwrap();
    let svg = fixtures::write_svg(dir.path(), "a.svg", svgs::PURE_RED);
    let ditherer = Ditherer::new(Rasterizer::new(vec![FakeBackend::new(
        "broken",
        Outcome::FailAfterWriting("boom"),
    )
    .boxed()]));

    let err = ditherer.svg_to_mono(&svg, None, None).unwrap_err();

    assert!(matches!(err, MonoError::Raster(_)), "got {err}");
    assert!(!dir.path().join("a.png").exists());
    assert!(!dir.path().join("a.r.bmp").exists());
}

#[cfg(feature = "render")]
mod rendered {
    use super::*;

    fn render(name: &str, svg: &str) -> (common::InkMap, common::InkMap, Vec<u8>, Vec<u8>) {
        let dir = tempfile::tempdir().unwrap();
        let svg = fixtures::write_svg(dir.path(), name, svg);
        let ditherer = Ditherer::new(Rasterizer::system().only(&["resvg".to_string()]));

        let paths = ditherer.svg_to_mono(&svg, None, None).unwrap();
        assert!(!svg.with_extension("png").exists());
        (
            common::read_bmp(&paths.red),
            common::read_bmp(&paths.black),
            std::fs::read(&paths.red).unwrap(),
            std::fs::read(&paths.black).unwrap(),
        )
    }

    #[test]
    fn test_gradient_planes_are_disjoint() {
        let (red, black, _, _) = render("gradient.svg", svgs::GRADIENT);

        common::assert_disjoint(&red, &black);
        assert!(red.count() > 0);
        assert!(black.count() > 0);
    }

    #[test]
    fn test_runs_are_byte_identical() {
        let (_, _, red_a, black_a) = render("gradient.svg", svgs::GRADIENT);
        let (_, _, red_b, black_b) = render("gradient.svg", svgs::GRADIENT);

        assert!(red_a == red_b, "red planes differ between runs");
        assert!(black_a == black_b, "black planes differ between runs");
    }

    #[test]
    fn test_landscape_artwork_is_centered() {
        let (red, black, _, _) = render("wide.svg", svgs::HALF_AND_HALF);

        // 100x50 fitted into 200x200 leaves white bands above and below
        assert!(!red.at(150, 10) && !black.at(150, 10));
        assert!(black.at(20, 100));
        assert!(red.at(180, 100));
    }
}
