use anyhow::{Context, Result};
use bubblegraph::runtime::{self, RenderRequest};
use bubblegraph::{csv_reader, ChartConfig, ChartError, DisplayMode, OutputFormat, RenderOptions};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bubblegraph")]
#[command(about = "Lay out CSV records as a force-directed bubble chart", long_about = None)]
struct Args {
    /// CSV or JSON (`.json`) file to read (CSV from stdin when absent)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Display mode: 'all', 'fuel', 'doors', 'fuel-system' or 'bodyStyle'
    #[arg(short, long, default_value = "all")]
    mode: DisplayMode,

    /// Legend selection: 'ALL' or a single category
    #[arg(short, long)]
    filter: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// JSON file overriding chart settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum simulation ticks before the frame is captured
    #[arg(long, default_value_t = 1000)]
    ticks: usize,

    /// Seed for initial bubble placement
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // Load failures are handed to the chart, which refuses to render.
    let data = match &args.input {
        Some(path) => csv_reader::read_records_from_path(path),
        None => csv_reader::read_records_from_stdin(),
    }
    .map_err(|e| ChartError::DataLoad(format!("{:#}", e)));

    let request = RenderRequest {
        mode: args.mode,
        filter: args.filter,
        options: RenderOptions {
            max_ticks: args.ticks,
            format: args.format,
        },
    };

    let bytes = runtime::render_chart(data, &config, &request)
        .context("Failed to render chart")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write image to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
