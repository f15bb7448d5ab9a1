//! SVG backend for deck asset builds.
//!
//! Locates SVG files, rasterizes sanitized markup to fixed-width PNGs with
//! resvg, and drives a whole directory through the pipeline.

pub mod batch;
pub mod locator;
pub mod rasterize;

pub use batch::{BatchDriver, PlannedAsset};
pub use locator::AssetLocator;
pub use rasterize::{Rasterizer, RenderedImage};
