use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One backend that ran and failed during a rasterization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub backend: String,
    pub reason: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

fn join_failures(failures: &[BackendFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  {f}"))
        .collect::<String>()
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error(
        "No conversion tool was found. Install one of: resvg, scene, inkscape, \
         rsvg-convert, svgexport or imagemagick (build with the `render` feature \
         or put a tool on PATH)"
    )]
    NoToolFound,

    #[error("Failed to convert svg to png:{}", join_failures(.failures))]
    AllConversionsFailed { failures: Vec<BackendFailure> },

    #[error("Cannot read input {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum MonoError {
    #[error("Rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("Unsupported PNG color type: {0:?}")]
    UnsupportedColor(png::ColorType),

    #[error("Dither error: {0}")]
    Dither(#[from] eink_dither::DitherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Build flag {0} is not defined")]
    MissingFlag(&'static str),

    #[error("No branch name found")]
    NoBranch,

    #[error("git {command} failed: {reason}")]
    Git { command: String, reason: String },

    #[error("Image conversion failed for {name}: {source}")]
    Image {
        name: String,
        #[source]
        source: MonoError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
