//! Discovery of source SVG files.

use std::path::{Path, PathBuf};

/// Finds vector assets in a directory by extension.
#[derive(Debug, Clone)]
pub struct AssetLocator {
    /// Extension to match, without the leading dot.
    extension: String,
}

impl AssetLocator {
    /// Create a locator matching `extension` (case-insensitive, dot optional).
    pub fn new(extension: impl AsRef<str>) -> Self {
        Self {
            extension: extension.as_ref().trim_start_matches('.').to_string(),
        }
    }

    /// Whether a path has the extension this locator matches.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }

    /// List matching regular files directly inside `dir`, sorted by file name.
    ///
    /// A missing or unreadable directory yields no assets rather than an error.
    pub fn locate(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("No assets in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            // Follows symlinks, so linked assets are included.
            if path.is_file() && self.matches(&path) {
                found.push(path);
            }
        }

        found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        log::debug!("Located {} asset(s) in {}", found.len(), dir.display());
        found
    }
}

impl Default for AssetLocator {
    fn default() -> Self {
        Self::new("svg")
    }
}
