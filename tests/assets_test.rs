//! Tests for batch asset steps: gzip and image conversion.

mod common;

use common::fixtures::{self, svgs};
use common::{FakeBackend, Outcome};
use epaper_tools::rendering::{Ditherer, Rasterizer};
use epaper_tools::services::{convert_images, gzip_assets, StampCache};
use flate2::read::GzDecoder;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Read;
use std::time::{Duration, SystemTime};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_gzip_assets_round_trip_and_skip() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let cache = dir.path().join(".pio/data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("favicon.svg"), svgs::PURE_RED).unwrap();
    fs::write(data.join("logo.png"), [0x89, b'P', b'N', b'G', 0, 1, 2, 3]).unwrap();
    let files = names(&["favicon.svg", "logo.png"]);

    let first = gzip_assets(&data, &cache, &files).unwrap();
    assert_eq!(first.written, files);

    let mut unpacked = String::new();
    GzDecoder::new(File::open(cache.join("favicon.svg.gz")).unwrap())
        .read_to_string(&mut unpacked)
        .unwrap();
    assert_eq!(unpacked, svgs::PURE_RED);
    assert!(cache.join("logo.png.timestamp").is_file());

    // Touch one source: only that one is compressed again
    File::options()
        .write(true)
        .open(data.join("logo.png"))
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(5))
        .unwrap();
    let second = gzip_assets(&data, &cache, &files).unwrap();
    assert_eq!(second.written, names(&["logo.png"]));
    assert_eq!(second.skipped, names(&["favicon.svg"]));
}

#[test]
fn test_convert_images_writes_planes_to_work_dir() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("assets/fs_images");
    let work = dir.path().join("data");
    let cache = dir.path().join(".pio/assets/fs_images");
    fs::create_dir_all(&source).unwrap();
    fixtures::write_svg(&source, "img_locked.svg", svgs::PURE_RED);
    fixtures::write_svg(&source, "img_logo.svg", svgs::PURE_RED);
    let files = names(&["img_locked.svg", "img_logo.svg"]);

    let backend = FakeBackend::new("solid", Outcome::Solid([255, 0, 0, 255]));
    let attempts = backend.attempts.clone();
    let ditherer = Ditherer::new(Rasterizer::new(vec![backend.boxed()]));

    let report = convert_images(&source, &work, &cache, &files, &ditherer).unwrap();
    assert_eq!(report.written, files);
    for stem in ["img_locked", "img_logo"] {
        assert!(work.join(format!("{stem}.svg")).is_file());
        assert!(!work.join(format!("{stem}.png")).exists());
        let red = common::read_bmp(&work.join(format!("{stem}.r.bmp")));
        assert_eq!(red.count(), 200 * 200);
    }
    assert_eq!(attempts.get(), 2);

    let again = convert_images(&source, &work, &cache, &files, &ditherer).unwrap();
    assert!(again.written.is_empty());
    assert_eq!(attempts.get(), 2);

    let stamps = StampCache::new(&cache);
    assert!(stamps.stamp_path("img_logo.svg").is_file());
}
