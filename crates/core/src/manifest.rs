//! Asset index output.
//!
//! Renders an [`AssetIndex`] either as a JSON manifest the deck builders can
//! load, or as the human-readable listing printed after a build.

use crate::{AssetIndex, Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Formatter for asset index manifests.
#[derive(Debug, Clone, Default)]
pub struct IndexFormatter {
    /// Directory that emitted paths are made relative to, if set.
    relative_to: Option<PathBuf>,
}

impl IndexFormatter {
    /// Create a formatter that emits paths as stored in the index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit paths relative to `base` where possible.
    pub fn with_relative_to(mut self, base: impl Into<PathBuf>) -> Self {
        self.relative_to = Some(base.into());
        self
    }

    fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        match &self.relative_to {
            Some(base) => path.strip_prefix(base).unwrap_or(path),
            None => path,
        }
    }

    /// Render the index as a pretty-printed JSON object of stem to path.
    ///
    /// # Example output
    /// ```text
    /// {
    ///   "product-dashboard-web": "assets_png/product-dashboard-web.png"
    /// }
    /// ```
    pub fn format_json(&self, index: &AssetIndex) -> Result<String> {
        let entries: BTreeMap<&str, &Path> = index
            .iter()
            .map(|(stem, path)| (stem, self.display_path(path)))
            .collect();

        serde_json::to_string_pretty(&entries).map_err(|e| Error::Manifest(e.to_string()))
    }

    /// Render the index as a listing of generated files.
    ///
    /// Returns an empty string for an empty index.
    ///
    /// # Example output
    /// ```text
    /// Generated:
    /// - assets_png/market-map.png
    /// - assets_png/product-dashboard-web.png
    /// ```
    pub fn format_listing(&self, index: &AssetIndex) -> String {
        if index.is_empty() {
            return String::new();
        }

        let mut output = String::from("Generated:\n");
        for (_, path) in index.iter() {
            output.push_str(&format!("- {}\n", self.display_path(path).display()));
        }
        output
    }

    /// Write the JSON manifest to `path`, creating parent directories.
    pub fn write_json(&self, index: &AssetIndex, path: &Path) -> Result<()> {
        let json = self.format_json(index)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, format!("{}\n", json)).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
