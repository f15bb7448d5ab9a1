//! Error types for deck asset builds.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning vector assets into rasters.
///
/// Every per-asset variant carries the path of the source SVG so a failed
/// build can be traced back to the offending file.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read an input file or prepare a directory.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The asset bytes could not be decoded as UTF-8 nor as Windows-1252.
    #[error("Failed to decode {} as UTF-8 or Windows-1252", path.display())]
    Decode { path: PathBuf },

    /// The sanitized markup could not be parsed or rendered.
    #[error("Failed converting SVG to PNG: {}: {reason}", path.display())]
    Rasterize { path: PathBuf, reason: String },

    /// The rendered raster could not be written.
    #[error("Failed writing PNG for {} to {}: {source}", asset.display(), path.display())]
    Output {
        asset: PathBuf,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two input files map to the same stem.
    #[error("Assets {} and {} share the stem '{stem}'", first.display(), second.display())]
    StemCollision {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A stem was requested from an index that does not contain it.
    #[error("No raster asset for stem '{0}'")]
    MissingAsset(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be loaded.
    #[error("Failed to load configuration from {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The asset index could not be serialized.
    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl Error {
    /// Path of the source asset this error refers to, if any.
    pub fn asset_path(&self) -> Option<&std::path::Path> {
        match self {
            Error::Decode { path } | Error::Rasterize { path, .. } => Some(path),
            Error::Output { asset, .. } => Some(asset),
            Error::StemCollision { second, .. } => Some(second),
            _ => None,
        }
    }
}
