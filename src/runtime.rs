// Runtime executor: one dataset in, one rendered frame out

use crate::category::DisplayMode;
use crate::chart::BubbleChart;
use crate::config::ChartConfig;
use crate::data::RawRecord;
use crate::error::ChartError;
use crate::graph;
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use tracing::info;

/// What to show before the frame is captured.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub mode: DisplayMode,
    /// Legend selection; `None` leaves every bubble visible.
    pub filter: Option<String>,
    pub options: RenderOptions,
}

/// Display `data`, apply the requested mode and filter, let the layout
/// settle and return the encoded image.
pub fn render_chart(
    data: Result<Vec<RawRecord>, ChartError>,
    config: &ChartConfig,
    request: &RenderRequest,
) -> Result<Vec<u8>> {
    let mut session = BubbleChart::new(config.clone())
        .display(data)
        .context("Failed to display chart")?;

    if request.mode != DisplayMode::Grouped {
        session
            .set_mode(request.mode)
            .with_context(|| format!("Failed to switch to '{}' mode", request.mode))?;
    }

    if let Some(key) = &request.filter {
        session.click_legend(key);
    }

    let ticks = session.run(request.options.max_ticks);
    // Let the entrance transition finish even if the layout settled early.
    let remaining = session.config().transition_ms - session.clock_ms();
    session.advance_clock(remaining);
    info!(ticks, settled = !session.simulation().is_running(), "layout finished");

    let scene = session.scene();
    match request.options.format {
        OutputFormat::Png => graph::render_png(&scene),
        OutputFormat::Svg => graph::render_svg(&scene).map(String::into_bytes),
    }
}
