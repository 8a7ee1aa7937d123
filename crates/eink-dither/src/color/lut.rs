//! Gamma lookup tables generated at compile time by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Sample a 4096-entry table with linear interpolation.
///
/// Input is clamped to `0.0..=1.0`.
#[inline]
fn sample(table: &[f32; 4096], value: f32) -> f32 {
    let scaled = value.clamp(0.0, 1.0) * 4095.0;
    let index = scaled as usize;

    if index >= 4095 {
        return table[4095];
    }

    let frac = scaled - index as f32;
    let a = table[index];
    let b = table[index + 1];
    a + (b - a) * frac
}

/// Convert an sRGB channel value (0.0..=1.0) to linear light.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    sample(&SRGB_TO_LINEAR, srgb)
}

/// Convert a linear channel value (0.0..=1.0) to sRGB.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    sample(&LINEAR_TO_SRGB, linear)
}
