//! SVG to PNG rasterization using resvg.

use deck_core::{Error, RasterAsset, RasterConfig, Result, SanitizedMarkup};
use resvg::tiny_skia;
use resvg::usvg;
use resvg::usvg::fontdb;
use std::path::Path;
use std::sync::Arc;

/// A rendered, PNG-encoded image held in memory.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

/// Renders sanitized SVG markup at a fixed output width.
///
/// The font database is loaded once and shared by every asset rendered
/// through this rasterizer.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    config: RasterConfig,
    fontdb: Arc<fontdb::Database>,
}

impl Rasterizer {
    /// Create a rasterizer using the system's installed fonts.
    pub fn new(config: RasterConfig) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} font face(s) for SVG text", db.len());
        Self::with_fonts(config, Arc::new(db))
    }

    /// Create a rasterizer with a caller-provided font database.
    pub fn with_fonts(config: RasterConfig, fontdb: Arc<fontdb::Database>) -> Self {
        Self { config, fontdb }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Pixel size of the output for an SVG of the given intrinsic size.
    ///
    /// Width is fixed by configuration; height keeps the aspect ratio,
    /// rounded to the nearest pixel and never below one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn output_size(&self, svg_width: f32, svg_height: f32) -> (u32, u32) {
        let width = self.config.width;
        let scale = width as f32 / svg_width;
        let height = (svg_height * scale).round().max(1.0) as u32;
        (width, height)
    }

    /// Parse and render markup to an in-memory PNG.
    pub fn render(&self, markup: &SanitizedMarkup) -> Result<RenderedImage> {
        let fail = |reason: String| Error::Rasterize {
            path: markup.source.clone(),
            reason,
        };

        let options = usvg::Options {
            resources_dir: markup.source.parent().map(Path::to_path_buf),
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };

        let tree = usvg::Tree::from_data(&markup.bytes, &options).map_err(|e| fail(e.to_string()))?;

        let size = tree.size();
        let (width, height) = self.output_size(size.width(), size.height());
        log::debug!(
            "Rendering {} from {}x{} to {}x{}",
            markup.source.display(),
            size.width(),
            size.height(),
            width,
            height
        );

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| fail(format!("cannot allocate a {}x{} pixmap", width, height)))?;

        let bg = self.config.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

        let scale = width as f32 / size.width();
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        let png = pixmap
            .encode_png()
            .map_err(|e| fail(format!("PNG encoding failed: {}", e)))?;

        Ok(RenderedImage { width, height, png })
    }

    /// Render markup and write the PNG to `out_path`, replacing any existing file.
    ///
    /// A failed write removes whatever was partially written.
    pub fn rasterize(&self, markup: &SanitizedMarkup, out_path: &Path) -> Result<RasterAsset> {
        let image = self.render(markup)?;

        if let Err(source) = std::fs::write(out_path, &image.png) {
            let _ = std::fs::remove_file(out_path);
            return Err(Error::Output {
                asset: markup.source.clone(),
                path: out_path.to_path_buf(),
                source,
            });
        }

        Ok(RasterAsset {
            stem: markup.stem.clone(),
            path: out_path.to_path_buf(),
            width: image.width,
            height: image.height,
        })
    }
}
