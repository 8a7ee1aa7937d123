//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use std::path::Path;

/// Decoded 1-bit BMP: `true` where the pixel uses color table index 0 (ink)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkMap {
    pub width: usize,
    pub height: usize,
    pub ink: Vec<bool>,
}

impl InkMap {
    pub fn count(&self) -> usize {
        self.ink.iter().filter(|&&on| on).count()
    }

    pub fn at(&self, x: usize, y: usize) -> bool {
        self.ink[y * self.width + x]
    }
}

fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

/// Read a 1-bit bottom-up BMP written by the ditherer
pub fn read_bmp(path: &Path) -> InkMap {
    let data = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    assert_eq!(&data[0..2], b"BM", "Missing BMP signature");
    assert_eq!(u32_at(&data, 2) as usize, data.len(), "File size field");
    assert_eq!(u16::from_le_bytes([data[28], data[29]]), 1, "Bits per pixel");

    let offset = u32_at(&data, 10) as usize;
    let width = u32_at(&data, 18) as usize;
    let height = u32_at(&data, 22) as usize;
    let stride = width.div_ceil(32) * 4;
    assert_eq!(data.len(), offset + stride * height, "Pixel array size");

    let mut ink = vec![false; width * height];
    for y in 0..height {
        let row = &data[offset + (height - 1 - y) * stride..];
        for x in 0..width {
            let bit = row[x / 8] & (0x80 >> (x % 8));
            ink[y * width + x] = bit == 0;
        }
    }
    InkMap { width, height, ink }
}

/// Assert a PNG file has the expected dimensions
pub fn assert_png_size(path: &Path, width: u32, height: u32) {
    let decoder = png::Decoder::new(std::fs::File::open(path).expect("Failed to open PNG"));
    let reader = decoder.read_info().expect("Not a valid PNG");
    let info = reader.info();
    assert_eq!(
        (info.width, info.height),
        (width, height),
        "Unexpected PNG size for {}",
        path.display()
    );
}

/// Assert the red and black planes never both carry ink on one pixel
pub fn assert_disjoint(red: &InkMap, black: &InkMap) {
    assert_eq!((red.width, red.height), (black.width, black.height));
    let overlap = red
        .ink
        .iter()
        .zip(&black.ink)
        .filter(|(r, b)| **r && **b)
        .count();
    assert_eq!(overlap, 0, "Red and black planes overlap");
}
