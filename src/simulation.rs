//! Layout engine: a small velocity-Verlet style force simulation.
//!
//! Each tick cools `alpha`, lets every force add to node velocities, then
//! damps velocities and moves nodes. Stepping stops once `alpha` falls below
//! `alpha_min`; `restart` re-energizes it.
//!
//! Forces, in application order:
//! ```text
//! x       v.x += (target_x - x) * strength * alpha
//! y       v.y += (target_y - y) * strength * alpha
//! charge  v   += d * s_j * alpha / |d|^2      for every other node j
//! ```

use crate::category::{Dimension, Point};
use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::nodes::VisualNode;
use tracing::debug;

/// Receives the node set after every simulation step.
pub trait TickObserver {
    fn ticked(&mut self, nodes: &[VisualNode]);
}

impl<F: FnMut(&[VisualNode])> TickObserver for F {
    fn ticked(&mut self, nodes: &[VisualNode]) {
        self(nodes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub alpha_target: f64,
    /// Fraction of velocity kept after each step (`1 - velocity decay`).
    pub velocity_retention: f64,
}

impl SimulationParams {
    pub fn with_velocity_decay(velocity_decay: f64) -> Self {
        let alpha_min: f64 = 0.001;
        Self {
            alpha_min,
            // Cools from 1 to alpha_min in 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_retention: 1.0 - velocity_decay,
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::with_velocity_decay(0.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Where a position force pulls each node.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisTarget {
    Fixed(f64),
    /// Per-category coordinate, keyed by the node's value in `dimension`.
    Category {
        dimension: Dimension,
        targets: Vec<(String, f64)>,
    },
}

impl AxisTarget {
    fn resolve(&self, node: &VisualNode) -> Result<f64, ChartError> {
        match self {
            AxisTarget::Fixed(v) => Ok(*v),
            AxisTarget::Category { dimension, targets } => {
                let key = node.category(*dimension);
                targets
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| ChartError::UnknownCategory {
                        dimension: *dimension,
                        key: key.to_string(),
                    })
            }
        }
    }
}

/// Pulls nodes along one axis towards a target coordinate.
#[derive(Debug, Clone)]
pub struct PositionForce {
    axis: Axis,
    strength: f64,
    target: AxisTarget,
    resolved: Vec<f64>,
}

impl PositionForce {
    pub fn new(axis: Axis, strength: f64, target: AxisTarget) -> Self {
        Self {
            axis,
            strength,
            target,
            resolved: Vec::new(),
        }
    }

    pub fn target(&self) -> &AxisTarget {
        &self.target
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Target coordinate for the node at `index`, once initialized.
    pub fn resolved(&self, index: usize) -> Option<f64> {
        self.resolved.get(index).copied()
    }

    fn initialize(&mut self, nodes: &[VisualNode]) -> Result<(), ChartError> {
        self.resolved = nodes
            .iter()
            .map(|n| self.target.resolve(n))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn apply(&self, nodes: &[VisualNode], velocities: &mut [(f64, f64)], alpha: f64) {
        for ((node, vel), target) in nodes.iter().zip(velocities.iter_mut()).zip(&self.resolved) {
            match self.axis {
                Axis::X => vel.0 += (target - node.x) * self.strength * alpha,
                Axis::Y => vel.1 += (target - node.y) * self.strength * alpha,
            }
        }
    }
}

/// Many-body force. A negative per-node strength repels.
#[derive(Debug, Clone)]
pub struct ChargeForce {
    coefficient: f64,
    exponent: f64,
    distance_min2: f64,
    strengths: Vec<f64>,
}

impl ChargeForce {
    /// Node strength is `-radius^exponent * coefficient`.
    pub fn new(coefficient: f64, exponent: f64) -> Self {
        Self {
            coefficient,
            exponent,
            distance_min2: 1.0,
            strengths: Vec::new(),
        }
    }

    pub fn strength_for(&self, radius: f64) -> f64 {
        -radius.powf(self.exponent) * self.coefficient
    }

    fn initialize(&mut self, nodes: &[VisualNode]) {
        self.strengths = nodes.iter().map(|n| self.strength_for(n.radius)).collect();
    }

    fn apply(&self, nodes: &[VisualNode], velocities: &mut [(f64, f64)], alpha: f64, rng: &mut Lcg) {
        for (i, node) in nodes.iter().enumerate() {
            let (mut vx, mut vy) = (0.0, 0.0);
            for (j, other) in nodes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut dx = other.x - node.x;
                let mut dy = other.y - node.y;
                let mut l = dx * dx + dy * dy;
                if dx == 0.0 {
                    dx = rng.jiggle();
                    l += dx * dx;
                }
                if dy == 0.0 {
                    dy = rng.jiggle();
                    l += dy * dy;
                }
                if l < self.distance_min2 {
                    l = (self.distance_min2 * l).sqrt();
                }
                let w = self.strengths[j] * alpha / l;
                vx += dx * w;
                vy += dy * w;
            }
            velocities[i].0 += vx;
            velocities[i].1 += vy;
        }
    }
}

/// The full force configuration.
#[derive(Debug, Clone)]
pub struct Forces {
    pub x: PositionForce,
    pub y: PositionForce,
    pub charge: ChargeForce,
}

impl Forces {
    fn initialize(&mut self, nodes: &[VisualNode]) -> Result<(), ChartError> {
        self.x.initialize(nodes)?;
        self.y.initialize(nodes)?;
        self.charge.initialize(nodes);
        Ok(())
    }
}

/// Deterministic linear congruential generator used to separate coincident
/// nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Lcg(u64);

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub fn new() -> Self {
        Lcg(1)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.0 = (Self::A * self.0 + Self::C) % Self::M;
        self.0 as f64 / Self::M as f64
    }

    fn jiggle(&mut self) -> f64 {
        (self.next_f64() - 0.5) * 1e-6
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a step reads and writes.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub nodes: Vec<VisualNode>,
    pub velocities: Vec<(f64, f64)>,
    pub alpha: f64,
    pub rng: Lcg,
}

impl LayoutState {
    pub fn new(nodes: Vec<VisualNode>, alpha: f64) -> Self {
        let velocities = vec![(0.0, 0.0); nodes.len()];
        Self {
            nodes,
            velocities,
            alpha,
            rng: Lcg::new(),
        }
    }
}

/// Advance `state` by one tick.
///
/// Forces must already be initialized for `state.nodes`.
pub fn step(params: &SimulationParams, forces: &Forces, mut state: LayoutState) -> LayoutState {
    state.alpha += (params.alpha_target - state.alpha) * params.alpha_decay;
    let alpha = state.alpha;

    forces.x.apply(&state.nodes, &mut state.velocities, alpha);
    forces.y.apply(&state.nodes, &mut state.velocities, alpha);
    forces.charge.apply(&state.nodes, &mut state.velocities, alpha, &mut state.rng);

    for (node, vel) in state.nodes.iter_mut().zip(state.velocities.iter_mut()) {
        vel.0 *= params.velocity_retention;
        vel.1 *= params.velocity_retention;
        node.x += vel.0;
        node.y += vel.1;
    }

    state
}

/// Owns the node set and its positions between `set_nodes` calls.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: SimulationParams,
    forces: Forces,
    state: LayoutState,
    running: bool,
    ticks: usize,
}

impl Simulation {
    /// A stopped simulation with no nodes, pulling towards `center`.
    pub fn new(config: &ChartConfig, center: Point) -> Self {
        let strength = config.force_strength;
        Self {
            params: SimulationParams::with_velocity_decay(config.velocity_decay),
            forces: Forces {
                x: PositionForce::new(Axis::X, strength, AxisTarget::Fixed(center.x)),
                y: PositionForce::new(Axis::Y, strength, AxisTarget::Fixed(center.y)),
                charge: ChargeForce::new(strength, config.charge_exponent),
            },
            state: LayoutState::new(Vec::new(), 1.0),
            running: false,
            ticks: 0,
        }
    }

    /// Replace the node set. Velocities reset; forces are re-evaluated for
    /// the new nodes. The simulation is left stopped.
    pub fn set_nodes(&mut self, nodes: Vec<VisualNode>) -> Result<(), ChartError> {
        let mut forces = self.forces.clone();
        forces.initialize(&nodes)?;
        self.forces = forces;
        self.state = LayoutState::new(nodes, self.state.alpha);
        self.running = false;
        debug!(nodes = self.state.nodes.len(), "simulation nodes set");
        Ok(())
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.state.nodes
    }

    pub fn forces(&self) -> &Forces {
        &self.forces
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Swap the horizontal attraction target. On error the current force is
    /// kept.
    pub fn set_x_target(&mut self, target: AxisTarget) -> Result<(), ChartError> {
        let mut force = PositionForce::new(Axis::X, self.forces.x.strength, target);
        force.initialize(&self.state.nodes)?;
        self.forces.x = force;
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total ticks stepped since creation.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Reset the energy to `alpha` and resume stepping.
    pub fn restart(&mut self, alpha: f64) {
        self.state.alpha = alpha;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Step once if running, then notify `observer`. Returns whether the
    /// simulation is still running afterwards.
    pub fn tick(&mut self, observer: &mut dyn TickObserver) -> bool {
        if !self.running {
            return false;
        }

        let state = std::mem::take(&mut self.state);
        self.state = step(&self.params, &self.forces, state);
        self.ticks += 1;
        observer.ticked(&self.state.nodes);

        if self.state.alpha < self.params.alpha_min {
            self.running = false;
            debug!(ticks = self.ticks, "simulation settled");
        }
        self.running
    }

    /// Fixed-step scheduler for headless hosts: tick until the simulation
    /// stops or `max_ticks` have run. Returns the number of ticks taken.
    pub fn run(&mut self, observer: &mut dyn TickObserver, max_ticks: usize) -> usize {
        let mut taken = 0;
        while taken < max_ticks && self.running {
            self.tick(observer);
            taken += 1;
        }
        taken
    }
}
