//! 1-bit BMP encoding of bitplanes.
//!
//! Layout: 14-byte file header, 40-byte BITMAPINFOHEADER, two-entry color
//! table (index 0 black, index 1 white), then rows bottom-up, each packed
//! MSB-first and padded to a multiple of 4 bytes. Ink ("on") pixels use
//! index 0.

use std::fs;
use std::io;
use std::path::Path;

use eink_dither::Bitplane;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const COLOR_TABLE_SIZE: u32 = 8;
/// 96 dpi
const PIXELS_PER_METER: i32 = 3780;

/// Bytes per stored row: 1 bit per pixel, padded to 4 bytes.
pub fn row_stride(width: usize) -> usize {
    width.div_ceil(32) * 4
}

/// Encode a bitplane as a 1-bit BMP file.
pub fn encode_bitplane(plane: &Bitplane) -> Vec<u8> {
    let width = plane.width();
    let height = plane.height();
    let stride = row_stride(width);
    let image_size = (stride * height) as u32;
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + COLOR_TABLE_SIZE;

    let mut out = Vec::with_capacity((data_offset + image_size) as usize);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(data_offset + image_size).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&data_offset.to_le_bytes());

    // BITMAPINFOHEADER; positive height means bottom-up rows
    out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&1u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes()); // colors used
    out.extend_from_slice(&2u32.to_le_bytes()); // colors important

    // Color table, BGRA
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(&[255, 255, 255, 0]);

    for y in (0..height).rev() {
        let mut row = plane.pack_row(y, false);
        row.resize(stride, 0);
        out.extend_from_slice(&row);
    }

    out
}

/// Write a bitplane to `path` as a 1-bit BMP.
pub fn write_bitplane(path: &Path, plane: &Bitplane) -> io::Result<()> {
    fs::write(path, encode_bitplane(plane))
}
