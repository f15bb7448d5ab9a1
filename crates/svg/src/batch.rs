//! Batch driver: locate, sanitize and rasterize a directory of assets.

use crate::{AssetLocator, Rasterizer};
use deck_core::types::stem_of;
use deck_core::{AssetIndex, BuildConfig, Error, RasterAsset, Result, Sanitizer, VectorAsset};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Output extension of rendered rasters.
const RASTER_EXTENSION: &str = "png";

/// One asset scheduled for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAsset {
    pub stem: String,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Runs every located asset through the sanitizer and rasterizer in order.
///
/// Processing is sequential and fail-fast: the first asset that cannot be
/// converted aborts the run and no index is returned.
#[derive(Debug)]
pub struct BatchDriver {
    config: BuildConfig,
    locator: AssetLocator,
    sanitizer: Sanitizer,
    rasterizer: Rasterizer,
}

impl BatchDriver {
    /// Create a driver, loading system fonts for the rasterizer.
    pub fn new(config: BuildConfig) -> Result<Self> {
        config.validate()?;
        let rasterizer = Rasterizer::new(config.raster);
        Ok(Self::assemble(config, rasterizer))
    }

    /// Create a driver around an existing rasterizer.
    ///
    /// The rasterizer's own settings take precedence over `config.raster`.
    pub fn with_rasterizer(config: BuildConfig, rasterizer: Rasterizer) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, rasterizer))
    }

    fn assemble(config: BuildConfig, rasterizer: Rasterizer) -> Self {
        Self {
            locator: AssetLocator::new(&config.extension),
            sanitizer: Sanitizer::new(),
            rasterizer,
            config,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Where the raster for `stem` is written.
    pub fn raster_path(&self, stem: &str) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.{}", stem, RASTER_EXTENSION))
    }

    /// Locate assets and map each to its output path.
    ///
    /// Fails if two inputs share a stem, before anything is written.
    pub fn plan(&self) -> Result<Vec<PlannedAsset>> {
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut planned = Vec::new();

        for source in self.locator.locate(&self.config.input_dir) {
            let stem = stem_of(&source);
            if let Some(first) = seen.get(&stem) {
                return Err(Error::StemCollision {
                    stem,
                    first: first.clone(),
                    second: source,
                });
            }
            seen.insert(stem.clone(), source.clone());

            planned.push(PlannedAsset {
                output: self.raster_path(&stem),
                stem,
                source,
            });
        }

        Ok(planned)
    }

    /// Convert every located asset and return the resulting index.
    pub fn run(&self) -> Result<AssetIndex> {
        let planned = self.plan()?;
        log::info!(
            "Converting {} SVG asset(s) from {}",
            planned.len(),
            self.config.input_dir.display()
        );

        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
            path: output_dir.clone(),
            source,
        })?;

        let mut index = AssetIndex::new();
        for asset in &planned {
            let raster = self.convert(&asset.source, &asset.output)?;
            index.insert(raster.stem, raster.path);
        }

        Ok(index)
    }

    /// Read, sanitize and rasterize a single asset.
    pub fn convert(&self, source: &Path, output: &Path) -> Result<RasterAsset> {
        let asset = VectorAsset::read(source)?;
        let markup = self.sanitizer.sanitize(&asset)?;
        let raster = self.rasterizer.rasterize(&markup, output)?;

        log::info!(
            "{} -> {} ({}x{})",
            source.display(),
            raster.path.display(),
            raster.width,
            raster.height
        );
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::RasterConfig;
    use resvg::usvg::fontdb;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn rect_svg(fill: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="{}"/></svg>"#,
            fill
        )
    }

    struct Fixture {
        _dir: TempDir,
        input: PathBuf,
        output: PathBuf,
    }

    fn fixture(files: &[(&str, &[u8])]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("assets");
        let output = dir.path().join("assets_png");
        fs::create_dir(&input).unwrap();
        for (name, content) in files {
            fs::write(input.join(name), content).unwrap();
        }
        Fixture {
            _dir: dir,
            input,
            output,
        }
    }

    fn driver(fixture: &Fixture) -> BatchDriver {
        let raster = RasterConfig::default().with_width(220);
        let config = BuildConfig::new(&fixture.input, &fixture.output).with_raster(raster);
        let rasterizer = Rasterizer::with_fonts(raster, Arc::new(fontdb::Database::new()));
        BatchDriver::with_rasterizer(config, rasterizer).unwrap()
    }

    #[test]
    fn test_three_assets_indexed() {
        let svg = rect_svg("navy");
        let fx = fixture(&[
            ("a.svg", svg.as_bytes()),
            ("b.svg", svg.as_bytes()),
            ("c.svg", svg.as_bytes()),
        ]);

        let index = driver(&fx).run().unwrap();

        assert_eq!(index.stems(), vec!["a", "b", "c"]);
        for (stem, path) in index.iter() {
            assert_eq!(path, fx.output.join(format!("{}.png", stem)));
            assert!(path.is_file());
        }
    }

    #[test]
    fn test_control_character_asset_converts() {
        let fx = fixture(&[(
            "soh.svg",
            &b"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"><rect width=\"10\" height=\"10\" fill=\"re\x01d\"/></svg>"[..],
        )]);

        let index = driver(&fx).run().unwrap();

        let png = index.require("soh").unwrap();
        assert!(fs::metadata(png).unwrap().len() > 0);
    }

    #[test]
    fn test_windows_1252_asset_converts() {
        let fx = fixture(&[(
            "quotes.svg",
            &b"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"><desc>\x93Pilot\x94 cohort</desc><rect width=\"10\" height=\"10\"/></svg>"[..],
        )]);

        let index = driver(&fx).run().unwrap();
        assert!(index.require("quotes").unwrap().is_file());
    }

    #[test]
    fn test_malformed_asset_fails_batch() {
        let svg = rect_svg("green");
        let fx = fixture(&[
            ("a.svg", svg.as_bytes()),
            ("b.svg", &b"<svg xmlns=\"http://www.w3.org/2000/svg\"><g>"[..]),
            ("c.svg", svg.as_bytes()),
        ]);

        let err = driver(&fx).run().unwrap_err();

        assert!(matches!(err, Error::Rasterize { .. }));
        assert!(err.to_string().contains("b.svg"));
        assert_eq!(err.asset_path(), Some(fx.input.join("b.svg").as_path()));
        // Sequential: later assets are never reached.
        assert!(!fx.output.join("b.png").exists());
        assert!(!fx.output.join("c.png").exists());
    }

    #[test]
    fn test_empty_directory() {
        let fx = fixture(&[("notes.txt", &b"nothing to see"[..])]);
        let index = driver(&fx).run().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_input_directory() {
        let fx = fixture(&[]);
        let config = BuildConfig::new(fx.input.join("gone"), &fx.output);
        let rasterizer = Rasterizer::with_fonts(config.raster, Arc::new(fontdb::Database::new()));

        let index = BatchDriver::with_rasterizer(config, rasterizer)
            .unwrap()
            .run()
            .unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_rerun_overwrites() {
        let svg = rect_svg("orange");
        let fx = fixture(&[("logo.svg", svg.as_bytes())]);
        let driver = driver(&fx);

        let first = driver.run().unwrap();
        let bytes_first = fs::read(first.require("logo").unwrap()).unwrap();
        let second = driver.run().unwrap();
        let bytes_second = fs::read(second.require("logo").unwrap()).unwrap();

        assert_eq!(first, second);
        assert_eq!(bytes_first, bytes_second);
    }

    #[test]
    fn test_stem_collision_rejected() {
        let svg = rect_svg("red");
        let fx = fixture(&[("chart.svg", svg.as_bytes()), ("chart.SVG", svg.as_bytes())]);

        let err = driver(&fx).plan().unwrap_err();
        assert!(matches!(err, Error::StemCollision { ref stem, .. } if stem == "chart"));
        assert!(!fx.output.exists());
    }

    #[test]
    fn test_plan_orders_and_maps_outputs() {
        let svg = rect_svg("red");
        let fx = fixture(&[("z.svg", svg.as_bytes()), ("m.svg", svg.as_bytes())]);

        let plan = driver(&fx).plan().unwrap();
        assert_eq!(
            plan,
            vec![
                PlannedAsset {
                    stem: "m".into(),
                    source: fx.input.join("m.svg"),
                    output: fx.output.join("m.png"),
                },
                PlannedAsset {
                    stem: "z".into(),
                    source: fx.input.join("z.svg"),
                    output: fx.output.join("z.png"),
                },
            ]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BuildConfig::default().with_raster(RasterConfig::default().with_width(0));
        let rasterizer = Rasterizer::with_fonts(config.raster, Arc::new(fontdb::Database::new()));
        assert!(BatchDriver::with_rasterizer(config, rasterizer).is_err());
    }
}
