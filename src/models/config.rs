use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::BuildContext;

/// Tool configuration loaded from epaper-tools.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    /// App name override (otherwise read from the `APP_NAME` build flag)
    pub app_name: Option<String>,

    /// Target board identifier, shown on the info pages
    pub board: String,

    /// Build environment name
    pub env_name: String,

    /// Compiler flags holding the `-D` defines
    pub build_flags: String,

    pub rasterizer: RasterizerConfig,
    pub images: ImagesConfig,
    pub gzip: GzipConfig,
    pub html: Vec<HtmlPageConfig>,
    pub firmware: FirmwareConfig,
}

/// Restricts and orders the rasterization backends.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RasterizerConfig {
    /// Backend names to use; empty means all, in the default order
    pub backends: Vec<String>,
}

/// SVG artwork converted to red/black bitplanes
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImagesConfig {
    pub source_dir: PathBuf,
    /// Directory the SVG is copied to; the planes are written next to it
    pub work_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub files: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("assets/fs_images"),
            work_dir: PathBuf::from("data"),
            cache_dir: PathBuf::from(".pio/assets/fs_images"),
            files: [
                "img_door_open.svg",
                "img_locked.svg",
                "img_logo.svg",
                "img_test.svg",
                "img_unlocked.svg",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Static web assets served pre-compressed
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GzipConfig {
    pub source_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub files: Vec<String>,
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data"),
            cache_dir: PathBuf::from(".pio/data"),
            files: [
                "logo.png",
                "apple-touch-icon.png",
                "favicon-96x96.png",
                "favicon.svg",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Which set of line rules an HTML page gets
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HtmlProfile {
    /// Device info / update pages: title, heading, board and build time
    Info,
    /// Captive portal detection page redirecting to the device
    CaptivePortal,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HtmlPageConfig {
    pub source: PathBuf,
    /// Gzipped output path
    pub output: PathBuf,
    pub profile: HtmlProfile,
    /// Appended to the app name in the page heading (Info pages)
    #[serde(default)]
    pub title_suffix: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FirmwareConfig {
    pub output_dir: PathBuf,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            board: String::new(),
            env_name: String::new(),
            build_flags: String::new(),
            rasterizer: RasterizerConfig::default(),
            images: ImagesConfig::default(),
            gzip: GzipConfig::default(),
            html: vec![HtmlPageConfig {
                source: PathBuf::from("assets/thingy.html"),
                output: PathBuf::from(".pio/assets/thingy.html.gz"),
                profile: HtmlProfile::Info,
                title_suffix: String::new(),
            }],
            firmware: FirmwareConfig::default(),
        }
    }
}

impl ToolsConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Build variables described by this configuration.
    pub fn build_context(&self) -> BuildContext {
        BuildContext {
            app_name: self.app_name.clone(),
            board: self.board.clone(),
            env_name: self.env_name.clone(),
            build_flags: self.build_flags.clone(),
        }
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        images = config.images.files.len(),
                        assets = config.gzip.files.len(),
                        pages = config.html.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::debug!(%e, path = %path.display(), "No config file, using defaults");
                Self::default()
            }
        }
    }
}
