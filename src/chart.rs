//! Chart sessions: one loaded dataset with its layout, primitives and UI
//! state.

use crate::category::{CategoryLabel, CategoryLayout, DisplayMode};
use crate::config::ChartConfig;
use crate::data::RawRecord;
use crate::error::ChartError;
use crate::interaction::{HoverState, Legend, Toolbar, Tooltip};
use crate::mode::ModeController;
use crate::nodes::{build_nodes, VisualNode};
use crate::palette::ColorPalette;
use crate::render::{BubbleLayer, Scene};
use crate::simulation::Simulation;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

/// Factory for chart sessions sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct BubbleChart {
    config: ChartConfig,
}

impl BubbleChart {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Start a session for a loaded dataset.
    ///
    /// A load failure is passed straight back and nothing is built. On
    /// success the session starts grouped with the simulation running.
    pub fn display(&self, data: Result<Vec<RawRecord>, ChartError>) -> Result<ChartSession, ChartError> {
        let records = data.map_err(|e| {
            error!(error = %e, "data load failed, chart not rendered");
            e
        })?;

        let config = self.config.clone();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let nodes = build_nodes(&records, &config, &mut rng);

        // Unlisted makes claim colors as their bubbles enter, largest first.
        let mut palette = ColorPalette::car_makes();
        for node in &nodes {
            palette.extend(node.group.clone());
        }

        let layout = CategoryLayout::new(config.width, config.height, config.label_offset, config.label_y);

        let mut bubbles = BubbleLayer::new(config.transition_ms);
        bubbles.bind(&nodes, &palette, 0.0);

        let mut simulation = Simulation::new(&config, layout.center());
        simulation.set_nodes(nodes)?;

        let mut mode = ModeController::new();
        mode.apply(DisplayMode::Grouped, &mut simulation, &layout)?;

        info!(records = records.len(), "chart displayed");

        Ok(ChartSession {
            legend: Legend::new(&palette),
            toolbar: Toolbar::default(),
            hover: HoverState::new(config.tooltip_offset),
            clock_ms: 0.0,
            config,
            layout,
            palette,
            simulation,
            bubbles,
            mode,
        })
    }
}

/// A displayed chart. Owns its nodes (through the simulation), their
/// primitives and the current mode.
#[derive(Debug, Clone)]
pub struct ChartSession {
    config: ChartConfig,
    layout: CategoryLayout,
    palette: ColorPalette,
    simulation: Simulation,
    bubbles: BubbleLayer,
    mode: ModeController,
    legend: Legend,
    toolbar: Toolbar,
    hover: HoverState,
    clock_ms: f64,
}

impl ChartSession {
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn layout(&self) -> &CategoryLayout {
        &self.layout
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn nodes(&self) -> &[VisualNode] {
        self.simulation.nodes()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn bubbles(&self) -> &BubbleLayer {
        &self.bubbles
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode.mode()
    }

    pub fn labels(&self) -> &[CategoryLabel] {
        self.mode.labels()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.hover.tooltip()
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Switch mode by command: `"all"` or a dimension key.
    pub fn toggle_display(&mut self, command: &str) -> Result<(), ChartError> {
        self.mode
            .toggle(command, &mut self.simulation, &self.layout)
            .map_err(|e| {
                warn!(command, error = %e, "display mode unchanged");
                e
            })
    }

    pub fn set_mode(&mut self, mode: DisplayMode) -> Result<(), ChartError> {
        self.mode.apply(mode, &mut self.simulation, &self.layout)
    }

    /// Toolbar click: mark the button active and switch mode. On error both
    /// the toolbar and the mode stay as they were.
    pub fn click_toolbar(&mut self, id: &str) -> Result<(), ChartError> {
        let previous = self.toolbar.clone();
        let result = self
            .toolbar
            .click(id)
            .and_then(|mode| self.mode.apply(mode, &mut self.simulation, &self.layout));
        if let Err(e) = &result {
            warn!(button = id, error = %e, "toolbar click ignored");
            self.toolbar = previous;
        }
        result
    }

    /// Legend click. Returns the number of bubbles left visible.
    pub fn click_legend(&mut self, key: &str) -> usize {
        let visible = self
            .legend
            .click(key, self.mode.mode(), self.simulation.nodes(), &mut self.bubbles);
        info!(key, visible, "legend filter applied");
        visible
    }

    /// Pointer moved to `(x, y)`: hover the bubble underneath, if any.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<&Tooltip> {
        match self.bubbles.hit_test(x, y, self.clock_ms) {
            Some(id) => {
                if let Some(node) = self.simulation.nodes().iter().find(|n| n.id == id) {
                    self.hover.hover_in(node, (x, y), &mut self.bubbles);
                }
            }
            None => self.pointer_leave(),
        }
        self.hover.tooltip()
    }

    pub fn pointer_leave(&mut self) {
        if let Some(id) = self.hover.hovered() {
            self.hover.hover_out(id, &mut self.bubbles);
        }
    }

    /// One animation frame: advance the clock and step the layout.
    /// Returns whether the layout is still moving.
    pub fn tick(&mut self) -> bool {
        self.clock_ms += self.config.frame_ms;
        self.simulation.tick(&mut self.bubbles)
    }

    /// Tick until the layout settles or `max_ticks` frames have run.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut taken = 0;
        while taken < max_ticks && self.simulation.is_running() {
            self.tick();
            taken += 1;
        }
        taken
    }

    /// Move the clock forward without stepping, e.g. to let the entrance
    /// transition finish.
    pub fn advance_clock(&mut self, ms: f64) {
        self.clock_ms += ms.max(0.0);
    }

    /// Snapshot of what should be on screen now.
    pub fn scene(&self) -> Scene {
        Scene {
            width: self.config.width.round().max(1.0) as u32,
            height: self.config.height.round().max(1.0) as u32,
            stroke_width: self.config.stroke_width,
            circles: self.bubbles.circles(self.clock_ms),
            labels: self.mode.labels().to_vec(),
        }
    }
}
