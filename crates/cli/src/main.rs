//! CLI tool for rasterizing pitch deck SVG assets.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{AssetIndex, Background, BuildConfig, IndexFormatter};
use deck_svg::BatchDriver;
use std::path::PathBuf;

/// Convert a directory of SVG diagrams into fixed-width PNGs for slide decks.
#[derive(Parser, Debug)]
#[command(name = "deck-assets")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the source SVGs (default: assets)
    input: Option<PathBuf>,

    /// Output directory for PNGs (default: assets_png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output width in pixels (default: 2200)
    #[arg(short, long)]
    width: Option<u32>,

    /// Background fill: white, black, transparent or #rrggbb[aa] (default: white)
    #[arg(short, long)]
    background: Option<Background>,

    /// Source file extension (default: svg)
    #[arg(long = "ext")]
    extension: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the stem -> PNG index as JSON to this file
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Log level for the SVG renderer itself (default: error)
    #[arg(long)]
    backend_log_level: Option<log::LevelFilter>,

    /// Don't print the list of generated files
    #[arg(short, long)]
    quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    init_logging(args.verbose, config.backend_log_level);

    let driver = BatchDriver::new(config).context("Invalid build configuration")?;
    let index = driver.run().context("Asset build failed")?;

    if let Some(manifest) = &args.manifest {
        IndexFormatter::new()
            .write_json(&index, manifest)
            .with_context(|| format!("Failed to write manifest {}", manifest.display()))?;
        log::info!("Wrote index to {}", manifest.display());
    }

    if !args.quiet {
        report(&index);
    }

    Ok(())
}

/// Build the effective configuration: file values first, then flags.
fn resolve_config(args: &Args) -> Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BuildConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input_dir = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(width) = args.width {
        config.raster.width = width;
    }
    if let Some(background) = args.background {
        config.raster.background = background;
    }
    if let Some(extension) = &args.extension {
        config.extension = extension.clone();
    }
    if let Some(level) = args.backend_log_level {
        config.backend_log_level = level;
    }

    Ok(config)
}

/// Install the logger. The renderer crates get their own, quieter level.
fn init_logging(verbose: bool, backend: log::LevelFilter) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .filter_module("usvg", backend)
        .filter_module("resvg", backend)
        .filter_module("fontdb", backend)
        .init();
}

/// Print the generated files.
fn report(index: &AssetIndex) {
    if index.is_empty() {
        eprintln!("No SVG assets found; nothing generated.");
        return;
    }
    print!("{}", IndexFormatter::new().format_listing(index));
}
