//! Command-line front end: generate a pattern and write its exports.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eightsix_renderer::{
    Configurable, DEFAULT_RASTER_SIZE, ExportFormat, FileSink, GeneratorConfig, LogoRenderer,
    default_filename,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eightsix", version, about = "Encode text as an 86-dot pattern logo")]
struct Cli {
    /// JSON configuration to start from
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text to encode (at most 250 UTF-16 units are kept)
    #[arg(short, long)]
    text: Option<String>,

    /// Dot radius in thousandths (20-80)
    #[arg(long)]
    dot_size: Option<f64>,

    /// Outer ring radius (0.5-1.2)
    #[arg(long)]
    spread: Option<f64>,

    /// Export border in percent (0-100)
    #[arg(long)]
    padding: Option<f64>,

    /// Permutation seed; any integer, wrapped to 32 bits
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Pick a random seed
    #[arg(long, conflicts_with = "seed")]
    random_seed: bool,

    /// Format to write; all three when omitted
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Side length of PNG output in pixels
    #[arg(long, default_value_t = DEFAULT_RASTER_SIZE)]
    size: u32,

    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Base file name (defaults to a timestamped name)
    #[arg(long)]
    name: Option<String>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::default();

        if let Some(path) = &self.config {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            config
                .apply_json(&json)
                .with_context(|| format!("failed to import {}", path.display()))?;
        }

        if let Some(text) = &self.text {
            config.text = text.clone();
        }
        if let Some(dot_size) = self.dot_size {
            config.dot_size = dot_size;
        }
        if let Some(spread) = self.spread {
            config.spread = spread;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.random_seed {
            config.randomize_seed(&mut rand::thread_rng());
        }

        Ok(config.sanitized())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let mut renderer = LogoRenderer::new(config);
    renderer.set_raster_size(cli.size);

    if cli.print_config {
        println!("{}", renderer.export_json()?);
        return Ok(());
    }

    info!(
        seed = renderer.config().seed,
        text_len = renderer.config().text.len(),
        "pattern generated"
    );

    let name = cli.name.clone().unwrap_or_else(default_filename);
    let mut sink = FileSink::new(&cli.out_dir);

    match cli.format {
        Some(format) => renderer
            .export(format, &name, &mut sink)
            .with_context(|| format!("failed to export {}", format.extension()))?,
        None => renderer
            .export_all(&name, &mut sink)
            .context("failed to export")?,
    }

    for path in sink.written() {
        println!("{}", path.display());
    }
    Ok(())
}
