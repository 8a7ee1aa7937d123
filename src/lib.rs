//! epaper-tools - build-time asset tooling for tri-color e-paper firmware
//!
//! Converts SVG artwork into red/black 1-bit BMP planes, pre-compresses web
//! assets, customizes the device's HTML pages and packages firmware images.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
