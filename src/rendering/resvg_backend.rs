//! In-process rasterization with resvg.

use super::backend::{in_process_probe, BackendError, Probe, RasterBackend, RasterJob};

/// Renders with the resvg crate. Needs no external tools; the background
/// stays transparent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResvgBackend;

impl RasterBackend for ResvgBackend {
    fn name(&self) -> &str {
        "resvg"
    }

    fn probe(&self) -> Probe {
        in_process_probe()
    }

    fn attempt(&self, job: &RasterJob) -> Result<(), BackendError> {
        render(job)
    }
}

#[cfg(feature = "render")]
fn render(job: &RasterJob) -> Result<(), BackendError> {
    use super::backend::{load_tree, save_pixmap, Placement};
    use resvg::usvg::Transform;
    use tiny_skia::Pixmap;

    let tree = load_tree(&job.input)?;
    let size = tree.size();
    let placement = Placement::fit(size.width(), size.height(), job.width, job.height);

    let mut pixmap = Pixmap::new(placement.width, placement.height).ok_or_else(|| {
        BackendError::Failed(format!(
            "cannot allocate {}x{} pixmap",
            placement.width, placement.height
        ))
    })?;

    let transform = Transform::from_scale(placement.scale, placement.scale)
        .post_translate(placement.offset_x, placement.offset_y);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    tracing::debug!(
        width = placement.width,
        height = placement.height,
        "resvg rendered"
    );
    save_pixmap(&pixmap, &job.output)
}

#[cfg(not(feature = "render"))]
fn render(_job: &RasterJob) -> Result<(), BackendError> {
    Err(BackendError::Unavailable(
        "built without the `render` feature".to_string(),
    ))
}
