//! Backends that shell out to SVG converters installed on the host.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use super::backend::{BackendError, Probe, RasterBackend, RasterJob};

/// Resolves program names to executables.
pub trait ToolLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Looks programs up on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocator;

impl ToolLocator for SystemLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Command line dialect of a converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgStyle {
    Inkscape,
    Rsvg,
    Svgexport,
    ImageMagick,
}

impl ArgStyle {
    pub fn args(self, job: &RasterJob) -> Vec<OsString> {
        let input = job.input.as_os_str().to_owned();
        let output = job.output.as_os_str().to_owned();

        match self {
            ArgStyle::Inkscape => {
                let mut export_filename = OsString::from("--export-filename=");
                export_filename.push(&output);
                let mut args = vec![
                    "--export-background-opacity=0".into(),
                    "--export-type=png".into(),
                    export_filename,
                    input,
                ];
                if let Some(w) = job.width {
                    args.push(format!("--export-width={w}").into());
                }
                if let Some(h) = job.height {
                    args.push(format!("--export-height={h}").into());
                }
                args
            }
            ArgStyle::Rsvg => {
                let mut args = vec![input, "-o".into(), output];
                if let Some(w) = job.width {
                    args.push(format!("--width={w}").into());
                }
                if let Some(h) = job.height {
                    args.push(format!("--height={h}").into());
                }
                args
            }
            ArgStyle::Svgexport => {
                let size = format!(
                    "{}:{}",
                    job.width.map(|w| w.to_string()).unwrap_or_default(),
                    job.height.map(|h| h.to_string()).unwrap_or_default()
                );
                vec![input, output, size.into()]
            }
            ArgStyle::ImageMagick => {
                let geometry = match (job.width, job.height) {
                    (Some(w), Some(h)) => format!("{w}x{h}"),
                    (Some(w), None) => w.to_string(),
                    (None, Some(h)) => format!("x{h}"),
                    (None, None) => String::new(),
                };
                let mut args = vec!["-background".into(), "none".into(), input];
                if !geometry.is_empty() {
                    args.push("-resize".into());
                    args.push(geometry.into());
                }
                args.push(output);
                args
            }
        }
    }
}

/// Windows ships an unrelated `convert.exe` (FAT to NTFS conversion).
fn is_windows_convert(path: &Path) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .contains("windows\\system32\\convert.exe")
}

/// A converter program invoked as a child process.
pub struct ExternalBackend {
    name: &'static str,
    program: &'static str,
    style: ArgStyle,
    reject: Option<fn(&Path) -> bool>,
    locator: Arc<dyn ToolLocator>,
}

impl ExternalBackend {
    pub fn new(
        name: &'static str,
        program: &'static str,
        style: ArgStyle,
        locator: Arc<dyn ToolLocator>,
    ) -> Self {
        Self {
            name,
            program,
            style,
            reject: None,
            locator,
        }
    }

    /// Treat resolved executables matching `reject` as missing.
    pub fn rejecting(mut self, reject: fn(&Path) -> bool) -> Self {
        self.reject = Some(reject);
        self
    }

    pub fn program(&self) -> &str {
        self.program
    }

    fn resolve(&self) -> Result<PathBuf, String> {
        let path = self
            .locator
            .locate(self.program)
            .ok_or_else(|| format!("{} not found", self.program))?;
        match self.reject {
            Some(reject) if reject(&path) => Err(format!(
                "{} resolves to {}, which is not a usable converter",
                self.program,
                path.display()
            )),
            _ => Ok(path),
        }
    }
}

impl RasterBackend for ExternalBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self) -> Probe {
        match self.resolve() {
            Ok(_) => Probe::Available,
            Err(reason) => Probe::Missing(reason),
        }
    }

    fn attempt(&self, job: &RasterJob) -> Result<(), BackendError> {
        let executable = self.resolve().map_err(BackendError::Unavailable)?;
        let args = self.style.args(job);
        tracing::debug!(backend = self.name, executable = %executable.display(), ?args, "Running converter");

        let output = Command::new(&executable)
            .args(&args)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => BackendError::Unavailable(format!(
                    "{} disappeared: {e}",
                    executable.display()
                )),
                _ => BackendError::Failed(format!("cannot run {}: {e}", executable.display())),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.lines().rev().find(|l| !l.trim().is_empty());
        Err(BackendError::Failed(match detail {
            Some(line) => format!("{}: {}", output.status, line.trim()),
            None => output.status.to_string(),
        }))
    }
}

/// The external converters in fallback order.
pub fn default_tools(locator: Arc<dyn ToolLocator>) -> Vec<ExternalBackend> {
    vec![
        ExternalBackend::new("inkscape", "inkscape", ArgStyle::Inkscape, locator.clone()),
        ExternalBackend::new("rsvg-convert", "rsvg-convert", ArgStyle::Rsvg, locator.clone()),
        ExternalBackend::new("rsvg", "rsvg", ArgStyle::Rsvg, locator.clone()),
        ExternalBackend::new("svgexport", "svgexport", ArgStyle::Svgexport, locator.clone()),
        ExternalBackend::new("magick", "magick", ArgStyle::ImageMagick, locator.clone()),
        ExternalBackend::new("convert", "convert", ArgStyle::ImageMagick, locator)
            .rejecting(is_windows_convert),
    ]
}
