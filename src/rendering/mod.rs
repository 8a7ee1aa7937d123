pub mod backend;
pub mod bmp;
pub mod external;
pub mod mono;
pub mod rasterizer;
pub mod resvg_backend;
pub mod scene;

pub use backend::{BackendError, Placement, Probe, RasterBackend, RasterJob};
pub use external::{ArgStyle, ExternalBackend, SystemLocator, ToolLocator};
pub use mono::{Ditherer, PlanePaths};
pub use rasterizer::Rasterizer;
pub use resvg_backend::ResvgBackend;
pub use scene::SceneBackend;
