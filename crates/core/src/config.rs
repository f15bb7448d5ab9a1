//! Build configuration.
//!
//! All settings are plain values handed to the batch driver; nothing here
//! reads or mutates process-wide state.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default output width of rendered rasters, in pixels.
pub const DEFAULT_RASTER_WIDTH: u32 = 2200;

/// An RGBA background fill for rendered rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Background {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Background {
    type Err = Error;

    /// Parse `white`, `black`, `transparent`/`none`, `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidConfig(format!("unrecognized background colour '{}'", s));
        let trimmed = s.trim();

        match trimmed.to_ascii_lowercase().as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "transparent" | "none" => return Ok(Self::TRANSPARENT),
            _ => {}
        }

        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    let v = digit.to_digit(16).ok_or_else(invalid)? as u8;
                    *slot = v * 0x11;
                }
                Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xFF {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Background {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Background {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Rasterizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Output width in pixels; height follows the SVG's aspect ratio.
    pub width: u32,

    /// Fill painted beneath the SVG.
    pub background: Background,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_RASTER_WIDTH,
            background: Background::WHITE,
        }
    }
}

impl RasterConfig {
    /// Set the output width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the background fill.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
}

/// Settings for one build run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding the source SVGs.
    pub input_dir: PathBuf,

    /// Directory the PNGs are written to.
    pub output_dir: PathBuf,

    /// File extension of source assets, without the dot.
    pub extension: String,

    /// Rasterizer settings.
    pub raster: RasterConfig,

    /// Verbosity of the SVG rendering backend's own log output.
    pub backend_log_level: log::LevelFilter,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("assets_png"),
            extension: "svg".to_string(),
            raster: RasterConfig::default(),
            backend_log_level: log::LevelFilter::Error,
        }
    }
}

impl BuildConfig {
    /// Create a configuration for the given input and output directories.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Set the rasterizer settings.
    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    /// Set the source extension filter.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Check that the settings can produce a build.
    pub fn validate(&self) -> Result<()> {
        if self.raster.width == 0 {
            return Err(Error::InvalidConfig("raster width must be positive".into()));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(Error::InvalidConfig("asset extension must not be empty".into()));
        }
        Ok(())
    }
}
