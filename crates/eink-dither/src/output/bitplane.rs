//! One-bit plane extracted from a dithered image.

/// A 1-bit raster in row-major order; `true` means "ink on".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitplane {
    bits: Vec<bool>,
    width: usize,
    height: usize,
}

impl Bitplane {
    /// Wrap per-pixel bits.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `bits.len() == width * height`.
    pub fn new(bits: Vec<bool>, width: usize, height: usize) -> Self {
        debug_assert_eq!(bits.len(), width * height);
        Self {
            bits,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    #[inline]
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    /// Number of "on" pixels.
    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Pack row `y` MSB-first into `ceil(width / 8)` bytes.
    ///
    /// "On" pixels are written as `on_bit`, "off" pixels as its complement.
    /// Unused trailing bits of the last byte are zero.
    pub fn pack_row(&self, y: usize, on_bit: bool) -> Vec<u8> {
        let row = &self.bits[y * self.width..(y + 1) * self.width];
        let mut packed = vec![0u8; self.width.div_ceil(8)];
        for (x, &on) in row.iter().enumerate() {
            if on == on_bit {
                packed[x / 8] |= 0x80 >> (x % 8);
            }
        }
        packed
    }
}
