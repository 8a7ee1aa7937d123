use std::fs;
use std::path::Path;

use super::gzip::AssetReport;
use super::stamp_cache::StampCache;
use crate::error::BuildError;
use crate::rendering::Ditherer;

/// Convert each SVG in `files` from `source_dir` into red/black bitplanes.
///
/// The SVG is copied to `work_dir` first so the planes land there. Sources
/// whose stamp in `cache_dir` is current are skipped.
pub fn convert_images(
    source_dir: &Path,
    work_dir: &Path,
    cache_dir: &Path,
    files: &[String],
    ditherer: &Ditherer,
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

        fs::create_dir_all(work_dir)?;
        let copy = work_dir.join(name);
        fs::copy(&source, &copy)?;

        let planes = ditherer
            .svg_to_mono(&copy, None, None)
            .map_err(|source| BuildError::Image {
                name: name.clone(),
                source,
            })?;
        tracing::info!(
            file = %name,
            red = %planes.red.display(),
            black = %planes.black.display(),
            "Converted image"
        );

        cache.record(&source, name)?;
        report.written.push(name.clone());
    }

    Ok(report)
}
