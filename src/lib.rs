// Library exports for bubblegraph

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod config;

// Layout pipeline
pub mod scale;
pub mod category;
pub mod nodes;
pub mod simulation;
pub mod mode;

// Presentation
pub mod palette;
pub mod render;
pub mod interaction;
pub mod format;
pub mod graph;

pub mod chart;
pub mod runtime;

pub use category::{Dimension, DisplayMode};
pub use chart::{BubbleChart, ChartSession};
pub use config::ChartConfig;
pub use data::RawRecord;
pub use error::ChartError;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    /// Upper bound on simulation ticks before the frame is captured.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_max_ticks() -> usize { 1000 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_ticks: 1000,
            format: OutputFormat::Png,
        }
    }
}
