pub mod build_context;
pub mod config;

pub use build_context::BuildContext;
pub use config::{
    FirmwareConfig, GzipConfig, HtmlPageConfig, HtmlProfile, ImagesConfig, RasterizerConfig,
    ToolsConfig,
};
