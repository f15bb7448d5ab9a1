//! Core asset types, SVG text sanitization, build configuration and
//! index manifests for rasterizing pitch deck diagrams.

pub mod config;
pub mod error;
pub mod manifest;
pub mod sanitize;
pub mod types;

pub use config::{Background, BuildConfig, RasterConfig, DEFAULT_RASTER_WIDTH};
pub use error::{Error, Result};
pub use manifest::IndexFormatter;
pub use sanitize::Sanitizer;
pub use types::{AssetIndex, RasterAsset, SanitizedMarkup, SourceEncoding, VectorAsset};
