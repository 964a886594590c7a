use crate::category::{CategoryLabel, CategoryLayout, DisplayMode};
use crate::error::ChartError;
use crate::simulation::{AxisTarget, Simulation};
use tracing::info;

/// Tracks the display mode and reconfigures the layout when it changes.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: DisplayMode,
    labels: Vec<CategoryLabel>,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Category labels currently shown. Empty when grouped.
    pub fn labels(&self) -> &[CategoryLabel] {
        &self.labels
    }

    /// Horizontal attraction target for `mode`.
    pub fn x_target(mode: DisplayMode, layout: &CategoryLayout) -> AxisTarget {
        match mode {
            DisplayMode::Grouped => AxisTarget::Fixed(layout.center().x),
            DisplayMode::Split(dimension) => AxisTarget::Category {
                dimension,
                targets: layout
                    .centers(dimension)
                    .iter()
                    .map(|(key, p)| (key.clone(), p.x))
                    .collect(),
            },
        }
    }

    /// Switch to `mode`: retarget the x force, swap the visible labels and
    /// restart the simulation at full energy.
    ///
    /// Any transition is allowed, including re-applying the current mode. If
    /// a node has no center in the requested dimension nothing changes.
    pub fn apply(
        &mut self,
        mode: DisplayMode,
        simulation: &mut Simulation,
        layout: &CategoryLayout,
    ) -> Result<(), ChartError> {
        simulation.set_x_target(Self::x_target(mode, layout))?;

        self.labels = match mode {
            DisplayMode::Grouped => Vec::new(),
            DisplayMode::Split(dim) => layout.labels(dim),
        };
        self.mode = mode;
        simulation.restart(1.0);

        info!(mode = %mode, "display mode applied");
        Ok(())
    }

    /// Parse a display command (`"all"` or a dimension key) and apply it.
    pub fn toggle(
        &mut self,
        command: &str,
        simulation: &mut Simulation,
        layout: &CategoryLayout,
    ) -> Result<(), ChartError> {
        let mode = command.parse::<DisplayMode>()?;
        self.apply(mode, simulation, layout)
    }
}
