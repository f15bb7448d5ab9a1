//! Domain types for vector inputs, sanitized markup and raster outputs.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A vector image read from disk, identified by its stem.
#[derive(Debug, Clone)]
pub struct VectorAsset {
    /// File name without its extension.
    pub stem: String,

    /// Location the bytes were read from.
    pub path: PathBuf,

    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl VectorAsset {
    /// Create an asset from bytes already in memory.
    pub fn new(stem: impl Into<String>, path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            stem: stem.into(),
            path: path.into(),
            bytes,
        }
    }

    /// Read an asset from disk, deriving the stem from the file name.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(stem_of(path), path, bytes))
    }
}

/// Derive the stem (file name without final extension) of a path.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Which decoder produced the text of a sanitized asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// The bytes were valid UTF-8.
    Utf8,
    /// UTF-8 decoding failed and the Windows-1252 fallback was used.
    Windows1252,
}

/// UTF-8 markup with XML-forbidden control characters removed.
#[derive(Debug, Clone)]
pub struct SanitizedMarkup {
    /// Stem of the originating asset.
    pub stem: String,

    /// Path of the originating asset.
    pub source: PathBuf,

    /// Sanitized UTF-8 bytes.
    pub bytes: Vec<u8>,

    /// Decoder that produced the text.
    pub encoding: SourceEncoding,

    /// Number of characters stripped by the filter.
    pub removed: usize,
}

impl SanitizedMarkup {
    /// View the markup as text.
    pub fn as_str(&self) -> &str {
        // Constructed only from `String`s by the sanitizer.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// A raster image written for one stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterAsset {
    /// Stem of the originating asset.
    pub stem: String,

    /// Location of the written PNG.
    pub path: PathBuf,

    /// Pixel width.
    pub width: u32,

    /// Pixel height.
    pub height: u32,
}

/// Mapping from asset stem to the raster file produced for it.
///
/// Iteration is ordered by stem, so repeated builds over the same inputs
/// produce identical listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl AssetIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raster for a stem, replacing any earlier entry.
    pub fn insert(&mut self, stem: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        self.entries.insert(stem.into(), path.into())
    }

    /// Look up the raster for a stem.
    pub fn get(&self, stem: &str) -> Option<&Path> {
        self.entries.get(stem).map(PathBuf::as_path)
    }

    /// Look up the raster for a stem, failing if it was never produced.
    pub fn require(&self, stem: &str) -> Result<&Path> {
        self.get(stem)
            .ok_or_else(|| Error::MissingAsset(stem.to_string()))
    }

    /// Whether a stem has a raster.
    pub fn contains(&self, stem: &str) -> bool {
        self.entries.contains_key(stem)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (stem, raster path) pairs in stem order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(stem, path)| (stem.as_str(), path.as_path()))
    }

    /// All stems in order.
    pub fn stems(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl Extend<RasterAsset> for AssetIndex {
    fn extend<T: IntoIterator<Item = RasterAsset>>(&mut self, iter: T) {
        for raster in iter {
            self.insert(raster.stem, raster.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of(Path::new("assets/product-dashboard-web.svg")), "product-dashboard-web");
        assert_eq!(stem_of(Path::new("a.b.svg")), "a.b");
        assert_eq!(stem_of(Path::new("noext")), "noext");
    }

    #[test]
    fn test_read_missing_file() {
        let err = VectorAsset::read(Path::new("/definitely/not/here.svg")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.svg"));
    }

    #[test]
    fn test_read_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.svg");
        std::fs::write(&path, b"<svg/>").unwrap();

        let asset = VectorAsset::read(&path).unwrap();
        assert_eq!(asset.stem, "logo");
        assert_eq!(asset.bytes, b"<svg/>");
        assert_eq!(asset.path, path);
    }

    #[test]
    fn test_index_insert_overwrites() {
        let mut index = AssetIndex::new();
        assert!(index.insert("a", "out/a.png").is_none());
        let previous = index.insert("a", "out/a2.png");

        assert_eq!(previous, Some(PathBuf::from("out/a.png")));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a"), Some(Path::new("out/a2.png")));
    }

    #[test]
    fn test_index_require() {
        let mut index = AssetIndex::new();
        index.insert("roadmap", "out/roadmap.png");

        assert_eq!(index.require("roadmap").unwrap(), Path::new("out/roadmap.png"));
        let err = index.require("missing").unwrap_err();
        assert!(matches!(err, Error::MissingAsset(ref s) if s == "missing"));
    }

    #[test]
    fn test_index_ordered_by_stem() {
        let mut index = AssetIndex::new();
        index.insert("c", "c.png");
        index.insert("a", "a.png");
        index.insert("b", "b.png");

        assert_eq!(index.stems(), vec!["a", "b", "c"]);
        assert!(index.contains("b"));
        assert!(!index.is_empty());
    }

    #[test]
    fn test_index_extend_from_rasters() {
        let mut index = AssetIndex::new();
        index.extend(vec![RasterAsset {
            stem: "flow".into(),
            path: PathBuf::from("out/flow.png"),
            width: 2200,
            height: 1100,
        }]);
        assert_eq!(index.get("flow"), Some(Path::new("out/flow.png")));
    }

    #[test]
    fn test_sanitized_markup_as_str() {
        let markup = SanitizedMarkup {
            stem: "x".into(),
            source: PathBuf::from("x.svg"),
            bytes: "<svg>é</svg>".as_bytes().to_vec(),
            encoding: SourceEncoding::Utf8,
            removed: 0,
        };
        assert_eq!(markup.as_str(), "<svg>é</svg>");
    }
}
