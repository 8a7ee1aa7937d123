//! Uniform interface of SVG to PNG rasterization backends.

use std::fmt;
use std::path::PathBuf;

/// Width used when neither dimension is requested.
pub const DEFAULT_WIDTH: u32 = 200;

/// One SVG to PNG conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl RasterJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            width: None,
            height: None,
        }
    }

    pub fn width(mut self, width: Option<u32>) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Option<u32>) -> Self {
        self.height = height;
        self
    }

    /// Apply the default width when no dimension was requested.
    pub fn with_default_size(mut self) -> Self {
        if self.width.is_none() && self.height.is_none() {
            self.width = Some(DEFAULT_WIDTH);
        }
        self
    }
}

/// Whether a backend can run on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Available,
    Missing(String),
}

/// Why a backend did not produce the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend is not installed or not usable here; the chain moves on
    /// without counting it as a failed conversion.
    Unavailable(String),
    /// The backend ran and failed.
    Failed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(reason) => write!(f, "unavailable: {reason}"),
            BackendError::Failed(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// A provider that converts an SVG file into a PNG file.
pub trait RasterBackend {
    /// Short name used in logs, error messages and backend selection.
    fn name(&self) -> &str;

    /// Check availability without converting anything.
    fn probe(&self) -> Probe;

    /// Convert `job.input` into a PNG at `job.output`.
    fn attempt(&self, job: &RasterJob) -> Result<(), BackendError>;
}

/// Output canvas size and the mapping of SVG user space onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Placement {
    /// Place an SVG of `svg_width` x `svg_height` user units.
    ///
    /// One dimension given: the other follows the aspect ratio. Both given:
    /// the canvas has exactly that size and the content is scaled uniformly
    /// to fit and centered. Neither given: [`DEFAULT_WIDTH`] applies.
    pub fn fit(svg_width: f32, svg_height: f32, width: Option<u32>, height: Option<u32>) -> Self {
        let proportional = |target: u32, from: f32, to: f32| -> u32 {
            ((to * target as f32 / from).round() as u32).max(1)
        };

        match (width, height) {
            (Some(w), Some(h)) => {
                let scale = (w as f32 / svg_width).min(h as f32 / svg_height);
                Self {
                    width: w,
                    height: h,
                    scale,
                    offset_x: (w as f32 - svg_width * scale) / 2.0,
                    offset_y: (h as f32 - svg_height * scale) / 2.0,
                }
            }
            (None, Some(h)) => Self {
                width: proportional(h, svg_height, svg_width),
                height: h,
                scale: h as f32 / svg_height,
                offset_x: 0.0,
                offset_y: 0.0,
            },
            (Some(w), None) => Self {
                width: w,
                height: proportional(w, svg_width, svg_height),
                scale: w as f32 / svg_width,
                offset_x: 0.0,
                offset_y: 0.0,
            },
            (None, None) => Self::fit(svg_width, svg_height, Some(DEFAULT_WIDTH), None),
        }
    }
}

/// Parse options shared by the in-process backends, with system fonts
/// loaded once per process.
#[cfg(feature = "render")]
pub(crate) fn usvg_options() -> resvg::usvg::Options<'static> {
    use resvg::usvg::fontdb;
    use std::sync::{Arc, OnceLock};

    static FONTDB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    let fontdb = FONTDB.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(font_count = db.len(), "Loaded system fonts for SVG text");
        Arc::new(db)
    });

    resvg::usvg::Options {
        fontdb: fontdb.clone(),
        ..Default::default()
    }
}

/// Read and parse the job's SVG.
#[cfg(feature = "render")]
pub(crate) fn load_tree(input: &std::path::Path) -> Result<resvg::usvg::Tree, BackendError> {
    let data = std::fs::read(input)
        .map_err(|e| BackendError::Failed(format!("cannot read {}: {e}", input.display())))?;
    resvg::usvg::Tree::from_data(&data, &usvg_options())
        .map_err(|e| BackendError::Failed(format!("SVG parse error: {e}")))
}

/// Encode a pixmap as PNG at `output`.
#[cfg(feature = "render")]
pub(crate) fn save_pixmap(
    pixmap: &tiny_skia::Pixmap,
    output: &std::path::Path,
) -> Result<(), BackendError> {
    let png = pixmap
        .encode_png()
        .map_err(|e| BackendError::Failed(format!("PNG encode error: {e}")))?;
    std::fs::write(output, png)
        .map_err(|e| BackendError::Failed(format!("cannot write {}: {e}", output.display())))
}

/// Probe result shared by the in-process backends.
pub(crate) fn in_process_probe() -> Probe {
    if cfg!(feature = "render") {
        Probe::Available
    } else {
        Probe::Missing("built without the `render` feature".to_string())
    }
}
