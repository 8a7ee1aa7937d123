//! Test fixtures: SVG documents and scripted backends.

use std::cell::Cell;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use epaper_tools::rendering::{
    BackendError, Placement, Probe, RasterBackend, RasterJob, ToolLocator,
};

/// SVG documents used across tests
pub mod svgs {
    /// 100x50 landscape, left half black, right half red
    pub const HALF_AND_HALF: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
  <rect width="50" height="50" fill="#000000"/>
  <rect x="50" width="50" height="50" fill="#ff0000"/>
</svg>"##;

    /// Square, pure red
    pub const PURE_RED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
  <rect width="20" height="20" fill="#ff0000"/>
</svg>"##;

    /// Square horizontal gradient from black over red to white
    pub const GRADIENT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40">
  <linearGradient id="g">
    <stop offset="0" stop-color="#000000"/>
    <stop offset="0.5" stop-color="#ff0000"/>
    <stop offset="1" stop-color="#ffffff"/>
  </linearGradient>
  <rect width="40" height="40" fill="url(#g)"/>
</svg>"##;
}

/// Write `content` to `dir/name` and return the path
pub fn write_svg(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write SVG fixture");
    path
}

/// Write a solid RGBA PNG
pub fn write_solid_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    let file = File::create(path).expect("Failed to create PNG");
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().expect("Failed to write PNG header");
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgba).collect();
    writer
        .write_image_data(&data)
        .expect("Failed to write PNG data");
}

/// What a [`FakeBackend`] does when attempted
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Write a solid PNG sized for a square SVG
    Solid([u8; 4]),
    /// Write a solid PNG of this size regardless of the request
    Sized(u32, u32, [u8; 4]),
    /// Write garbage to the output, then fail
    FailAfterWriting(&'static str),
    /// Fail without touching the output
    Fail(&'static str),
    /// Report success without writing anything
    SilentSuccess,
}

/// Scripted backend counting its attempts
pub struct FakeBackend {
    pub name: &'static str,
    pub available: bool,
    pub outcome: Outcome,
    pub attempts: Rc<Cell<usize>>,
}

impl FakeBackend {
    pub fn new(name: &'static str, outcome: Outcome) -> Self {
        Self {
            name,
            available: true,
            outcome,
            attempts: Rc::new(Cell::new(0)),
        }
    }

    pub fn missing(name: &'static str) -> Self {
        Self {
            available: false,
            ..Self::new(name, Outcome::Fail("should not run"))
        }
    }

    pub fn boxed(self) -> Box<dyn RasterBackend> {
        Box::new(self)
    }
}

impl RasterBackend for FakeBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self) -> Probe {
        if self.available {
            Probe::Available
        } else {
            Probe::Missing(format!("{} not found", self.name))
        }
    }

    fn attempt(&self, job: &RasterJob) -> Result<(), BackendError> {
        self.attempts.set(self.attempts.get() + 1);
        match &self.outcome {
            Outcome::Solid(rgba) => {
                let placement = Placement::fit(1.0, 1.0, job.width, job.height);
                write_solid_png(&job.output, placement.width, placement.height, *rgba);
                Ok(())
            }
            Outcome::Sized(width, height, rgba) => {
                write_solid_png(&job.output, *width, *height, *rgba);
                Ok(())
            }
            Outcome::FailAfterWriting(reason) => {
                fs::write(&job.output, b"partial").expect("Failed to write partial output");
                Err(BackendError::Failed(reason.to_string()))
            }
            Outcome::Fail(reason) => Err(BackendError::Failed(reason.to_string())),
            Outcome::SilentSuccess => Ok(()),
        }
    }
}

/// Locator that finds only the listed programs
pub struct FakeLocator(pub Vec<(&'static str, PathBuf)>);

impl FakeLocator {
    pub fn empty() -> Self {
        Self(Vec::new())
    }
}

impl ToolLocator for FakeLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.0
            .iter()
            .find(|(name, _)| *name == program)
            .map(|(_, path)| path.clone())
    }
}
