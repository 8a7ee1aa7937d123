use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use super::stamp_cache::StampCache;
use crate::error::BuildError;

/// Result of a batch step over a list of files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssetReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Gzip `source` to `dest` with maximum compression.
pub fn gzip_file(source: &Path, dest: &Path) -> io::Result<()> {
    let mut input = BufReader::new(File::open(source)?);
    gzip_to(&mut input, dest)
}

/// Gzip in-memory bytes to `dest`.
pub fn gzip_bytes(data: &[u8], dest: &Path) -> io::Result<()> {
    let mut input = data;
    gzip_to(&mut input, dest)
}

fn gzip_to(input: &mut impl io::Read, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(dest)?), Compression::best());
    io::copy(input, &mut encoder)?;
    encoder.finish()?.flush()
}

/// Pre-compress static assets: `<source_dir>/<name>` becomes
/// `<cache_dir>/<name>.gz`, skipping files whose stamp is current.
pub fn gzip_assets(
    source_dir: &Path,
    cache_dir: &Path,
    files: &[String],
) -> Result<AssetReport, BuildError> {
    let cache = StampCache::new(cache_dir);
    let mut report = AssetReport::default();

    for name in files {
        let source = source_dir.join(name);
        if !source.is_file() {
            return Err(BuildError::MissingSource(source));
        }
        if cache.is_fresh(&source, name)? {
            tracing::info!(file = %name, "up to date");
            report.skipped.push(name.clone());
            continue;
        }

        let dest = cache_dir.join(format!("{name}.gz"));
        tracing::info!(source = %source.display(), dest = %dest.display(), "gzip");
        gzip_file(&source, &dest)?;
        cache.record(&source, name)?;
        report.written.push(name.clone());
    }

    Ok(report)
}
