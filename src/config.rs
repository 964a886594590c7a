use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Tunables for layout, sizing and animation.
///
/// Every field has a default, so a config file only needs to list what it
/// overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Strength of the x/y positioning forces; also scales the charge.
    pub force_strength: f64,
    pub velocity_decay: f64,
    pub charge_exponent: f64,
    pub radius_range: (f64, f64),
    pub radius_exponent: f64,
    /// Multiplied with `width` to turn a scaled radius into pixels.
    pub size_factor: f64,
    pub transition_ms: f64,
    pub frame_ms: f64,
    pub label_y: f64,
    pub label_offset: f64,
    /// Initial positions are drawn from `[0, spawn.0) x [0, spawn.1)`.
    pub spawn: (f64, f64),
    pub stroke_width: u32,
    pub tooltip_offset: (f64, f64),
    pub seed: Option<u64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            force_strength: 0.03,
            velocity_decay: 0.2,
            charge_exponent: 2.13,
            radius_range: (2.0, 30.0),
            radius_exponent: 0.5,
            size_factor: 0.001,
            transition_ms: 2000.0,
            frame_ms: 1000.0 / 60.0,
            label_y: 40.0,
            label_offset: 50.0,
            spawn: (900.0, 800.0),
            stroke_width: 2,
            tooltip_offset: (20.0, 20.0),
            seed: None,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Invalid chart config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
