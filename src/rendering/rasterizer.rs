use std::fs;
use std::io;
use std::sync::Arc;

use super::backend::{BackendError, Probe, RasterBackend, RasterJob};
use super::external::{default_tools, SystemLocator, ToolLocator};
use super::resvg_backend::ResvgBackend;
use super::scene::SceneBackend;
use crate::error::{BackendFailure, RasterError};

/// Converts SVG to PNG by trying backends in order until one succeeds.
///
/// Missing backends are skipped silently apart from a log line. A backend
/// that runs and fails is recorded and the next one is tried. The output
/// path is cleared before every attempt and after every failure.
pub struct Rasterizer {
    backends: Vec<Box<dyn RasterBackend>>,
}

impl Rasterizer {
    /// Rasterizer over an explicit backend list.
    pub fn new(backends: Vec<Box<dyn RasterBackend>>) -> Self {
        Self { backends }
    }

    /// The default chain: resvg, scene, then external tools found by `locator`.
    pub fn with_locator(locator: Arc<dyn ToolLocator>) -> Self {
        let mut backends: Vec<Box<dyn RasterBackend>> =
            vec![Box::new(ResvgBackend), Box::new(SceneBackend)];
        for tool in default_tools(locator) {
            backends.push(Box::new(tool));
        }
        Self { backends }
    }

    /// The default chain with tools looked up on `PATH`.
    pub fn system() -> Self {
        Self::with_locator(Arc::new(SystemLocator))
    }

    /// Keep only the named backends, in the order given.
    ///
    /// Unknown names are ignored with a warning.
    pub fn only(mut self, names: &[String]) -> Self {
        if names.is_empty() {
            return self;
        }
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            match self.backends.iter().position(|b| b.name() == name) {
                Some(index) => selected.push(self.backends.remove(index)),
                None => tracing::warn!(backend = %name, "Unknown rasterization backend"),
            }
        }
        self.backends = selected;
        self
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn RasterBackend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    /// Probe every backend without converting anything.
    pub fn probe_all(&self) -> Vec<(String, Probe)> {
        self.backends
            .iter()
            .map(|b| (b.name().to_string(), b.probe()))
            .collect()
    }

    /// Produce a PNG at `job.output`; returns the name of the backend used.
    ///
    /// Without width and height the width defaults to 200 pixels.
    pub fn rasterize(&self, job: &RasterJob) -> Result<String, RasterError> {
        fs::metadata(&job.input).map_err(|source| RasterError::Input {
            path: job.input.clone(),
            source,
        })?;

        let job = job.clone().with_default_size();
        let mut failures = Vec::new();

        for backend in &self.backends {
            let name = backend.name();

            if let Probe::Missing(reason) = backend.probe() {
                tracing::info!(backend = name, %reason, "Backend not available");
                continue;
            }

            // Only a file written by this attempt counts as output
            remove_output(&job);
            match backend.attempt(&job) {
                Ok(()) if job.output.is_file() => {
                    tracing::info!(
                        backend = name,
                        input = %job.input.display(),
                        output = %job.output.display(),
                        "Converted SVG to PNG"
                    );
                    return Ok(name.to_string());
                }
                Ok(()) => {
                    tracing::warn!(backend = name, "Backend reported success without output");
                    failures.push(BackendFailure {
                        backend: name.to_string(),
                        reason: "no output file written".to_string(),
                    });
                }
                Err(BackendError::Unavailable(reason)) => {
                    tracing::info!(backend = name, %reason, "Backend not available");
                }
                Err(BackendError::Failed(reason)) => {
                    tracing::warn!(backend = name, %reason, "Conversion failed");
                    remove_output(&job);
                    failures.push(BackendFailure {
                        backend: name.to_string(),
                        reason,
                    });
                }
            }
        }

        if failures.is_empty() {
            Err(RasterError::NoToolFound)
        } else {
            Err(RasterError::AllConversionsFailed { failures })
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::system()
    }
}

fn remove_output(job: &RasterJob) {
    match fs::remove_file(&job.output) {
        Ok(()) => tracing::debug!(path = %job.output.display(), "Removed existing output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(%e, path = %job.output.display(), "Failed to remove existing output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NoTools;

    impl ToolLocator for NoTools {
        fn locate(&self, _program: &str) -> Option<PathBuf> {
            None
        }
    }

    fn names(rasterizer: &Rasterizer) -> Vec<String> {
        rasterizer.backends().map(|b| b.name().to_string()).collect()
    }

    #[test]
    fn test_default_chain_order() {
        let rasterizer = Rasterizer::with_locator(Arc::new(NoTools));
        assert_eq!(
            names(&rasterizer),
            vec![
                "resvg",
                "scene",
                "inkscape",
                "rsvg-convert",
                "rsvg",
                "svgexport",
                "magick",
                "convert"
            ]
        );
    }

    #[test]
    fn test_only_reorders_and_filters() {
        let rasterizer = Rasterizer::with_locator(Arc::new(NoTools)).only(&[
            "magick".to_string(),
            "bogus".to_string(),
            "resvg".to_string(),
        ]);
        assert_eq!(names(&rasterizer), vec!["magick", "resvg"]);
    }

    #[test]
    fn test_only_with_empty_list_keeps_all() {
        let rasterizer = Rasterizer::with_locator(Arc::new(NoTools)).only(&[]);
        assert_eq!(rasterizer.backends().count(), 8);
    }

    #[test]
    fn test_missing_input_is_reported() {
        let rasterizer = Rasterizer::with_locator(Arc::new(NoTools));
        let err = rasterizer
            .rasterize(&RasterJob::new("/nonexistent/in.svg", "/nonexistent/out.png"))
            .unwrap_err();
        assert!(matches!(err, RasterError::Input { .. }));
    }

    #[test]
    fn test_probe_all_reports_external_tools_missing() {
        let probes = Rasterizer::with_locator(Arc::new(NoTools)).probe_all();
        assert_eq!(probes.len(), 8);
        assert!(probes[2..]
            .iter()
            .all(|(_, probe)| matches!(probe, Probe::Missing(_))));
    }
}
