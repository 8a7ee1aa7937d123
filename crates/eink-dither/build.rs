use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Number of entries in each gamma table.
const LUT_SIZE: usize = 4096;

/// IEC 61966-2-1: sRGB to linear
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// IEC 61966-2-1: linear to sRGB
fn linear_to_srgb_exact(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

fn write_table(
    out: &mut impl Write,
    name: &str,
    doc: &str,
    f: fn(f64) -> f64,
) -> std::io::Result<()> {
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub static {name}: [f32; {LUT_SIZE}] = [")?;
    let last = (LUT_SIZE - 1) as f64;
    for i in 0..LUT_SIZE {
        if i > 0 && i % 8 == 0 {
            writeln!(out)?;
        }
        write!(out, "    {:.9},", f(i as f64 / last) as f32)?;
    }
    writeln!(out, "\n];")
}

fn main() -> std::io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut out = BufWriter::new(File::create(dest_path)?);

    write_table(
        &mut out,
        "SRGB_TO_LINEAR",
        "sRGB to linear lookup, indexed by srgb * 4095",
        srgb_to_linear_exact,
    )?;
    writeln!(out)?;
    write_table(
        &mut out,
        "LINEAR_TO_SRGB",
        "Linear to sRGB lookup, indexed by linear * 4095",
        linear_to_srgb_exact,
    )?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
