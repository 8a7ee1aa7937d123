pub mod firmware;
pub mod gzip;
pub mod html;
pub mod image_batch;
pub mod stamp_cache;

pub use firmware::{
    firmware_variant, package_firmware, resolve_version, FirmwarePackage, GitRepo, SystemGit,
};
pub use gzip::{gzip_assets, gzip_file, AssetReport};
pub use html::{customize_html, customize_lines, HtmlOutcome, PageVars};
pub use image_batch::convert_images;
pub use stamp_cache::StampCache;
