//! Alternate in-process pathway: the parsed SVG node graph is flattened
//! into a list of drawing objects which are then painted with tiny-skia.
//!
//! Only solid fills and strokes are drawn. Gradients are approximated by
//! the mean of their stops, text is drawn from its outlines, and embedded
//! raster images, patterns, filters, clips and masks are left out.

use super::backend::{in_process_probe, BackendError, Probe, RasterBackend, RasterJob};

#[derive(Debug, Default, Clone, Copy)]
pub struct SceneBackend;

impl RasterBackend for SceneBackend {
    fn name(&self) -> &str {
        "scene"
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

    let tree = load_tree(&job.input)?;
    let scene = Scene::from_tree(&tree);
    let placement = Placement::fit(scene.width, scene.height, job.width, job.height);
    let pixmap = scene.render(&placement)?;

    tracing::debug!(
        items = scene.items.len(),
        width = placement.width,
        height = placement.height,
        "scene rendered"
    );
    save_pixmap(&pixmap, &job.output)
}

#[cfg(not(feature = "render"))]
fn render(_job: &RasterJob) -> Result<(), BackendError> {
    Err(BackendError::Unavailable(
        "built without the `render` feature".to_string(),
    ))
}

#[cfg(feature = "render")]
pub use scene_graph::{DrawItem, Scene};

#[cfg(feature = "render")]
mod scene_graph {
    use resvg::usvg::{self, Node, Paint, PaintOrder};
    use tiny_skia::{FillRule, Pixmap, Transform};

    use super::super::backend::{BackendError, Placement};

    /// One drawing object in SVG user space.
    #[derive(Debug, Clone)]
    pub enum DrawItem {
        Fill {
            path: tiny_skia::Path,
            color: [u8; 4],
            rule: FillRule,
            transform: Transform,
        },
        Stroke {
            path: tiny_skia::Path,
            color: [u8; 4],
            stroke: tiny_skia::Stroke,
            transform: Transform,
        },
    }

    /// Flat, ordered list of drawing objects for one SVG document.
    #[derive(Debug, Clone)]
    pub struct Scene {
        pub width: f32,
        pub height: f32,
        pub items: Vec<DrawItem>,
    }

    impl Scene {
        pub fn from_tree(tree: &usvg::Tree) -> Self {
            let mut items = Vec::new();
            collect(tree.root(), 1.0, &mut items);
            Self {
                width: tree.size().width(),
                height: tree.size().height(),
                items,
            }
        }

        /// Paint all items onto a transparent canvas.
        pub fn render(&self, placement: &Placement) -> Result<Pixmap, BackendError> {
            let mut pixmap = Pixmap::new(placement.width, placement.height).ok_or_else(|| {
                BackendError::Failed(format!(
                    "cannot allocate {}x{} pixmap",
                    placement.width, placement.height
                ))
            })?;
            let view = Transform::from_scale(placement.scale, placement.scale)
                .post_translate(placement.offset_x, placement.offset_y);

            for item in &self.items {
                match item {
                    DrawItem::Fill {
                        path,
                        color,
                        rule,
                        transform,
                    } => {
                        let paint = solid_paint(*color);
                        pixmap.fill_path(path, &paint, *rule, transform.post_concat(view), None);
                    }
                    DrawItem::Stroke {
                        path,
                        color,
                        stroke,
                        transform,
                    } => {
                        let paint = solid_paint(*color);
                        pixmap.stroke_path(path, &paint, stroke, transform.post_concat(view), None);
                    }
                }
            }
            Ok(pixmap)
        }
    }

    fn solid_paint(color: [u8; 4]) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;
        paint
    }

    fn collect(group: &usvg::Group, opacity: f32, items: &mut Vec<DrawItem>) {
        let opacity = opacity * group.opacity().get();
        for node in group.children() {
            match node {
                Node::Group(child) => collect(child, opacity, items),
                Node::Path(path) => push_path(path, opacity, items),
                Node::Text(text) => collect(text.flattened(), opacity, items),
                Node::Image(_) => tracing::debug!("scene: skipping embedded image"),
            }
        }
    }

    fn push_path(path: &usvg::Path, opacity: f32, items: &mut Vec<DrawItem>) {
        if !path.is_visible() {
            return;
        }

        let fill = path.fill().and_then(|fill| {
            let color = paint_color(fill.paint(), opacity * fill.opacity().get())?;
            let rule = match fill.rule() {
                usvg::FillRule::NonZero => FillRule::Winding,
                usvg::FillRule::EvenOdd => FillRule::EvenOdd,
            };
            Some(DrawItem::Fill {
                path: path.data().clone(),
                color,
                rule,
                transform: path.abs_transform(),
            })
        });

        let stroke = path.stroke().and_then(|stroke| {
            let color = paint_color(stroke.paint(), opacity * stroke.opacity().get())?;
            Some(DrawItem::Stroke {
                path: path.data().clone(),
                color,
                stroke: stroke.to_tiny_skia(),
                transform: path.abs_transform(),
            })
        });

        let ordered = match path.paint_order() {
            PaintOrder::FillAndStroke => [fill, stroke],
            PaintOrder::StrokeAndFill => [stroke, fill],
        };
        items.extend(ordered.into_iter().flatten());
    }

    /// Solid RGBA for a paint; gradients become the mean of their stops.
    fn paint_color(paint: &Paint, opacity: f32) -> Option<[u8; 4]> {
        let (color, paint_opacity) = match paint {
            Paint::Color(color) => (*color, 1.0),
            Paint::LinearGradient(gradient) => mean_stop(gradient.stops())?,
            Paint::RadialGradient(gradient) => mean_stop(gradient.stops())?,
            Paint::Pattern(_) => return None,
        };
        let alpha = (opacity * paint_opacity * 255.0).round().clamp(0.0, 255.0) as u8;
        Some([color.red, color.green, color.blue, alpha])
    }

    fn mean_stop(stops: &[usvg::Stop]) -> Option<(usvg::Color, f32)> {
        if stops.is_empty() {
            return None;
        }
        let (mut red, mut green, mut blue, mut opacity) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for stop in stops {
            let color = stop.color();
            red += color.red as f32;
            green += color.green as f32;
            blue += color.blue as f32;
            opacity += stop.opacity().get();
        }
        let n = stops.len() as f32;
        let channel = |sum: f32| (sum / n).round() as u8;
        let color = usvg::Color {
            red: channel(red),
            green: channel(green),
            blue: channel(blue),
        };
        Some((color, opacity / n))
    }
}
