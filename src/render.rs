//! Render adapter: binds nodes to circle primitives and keeps them in step
//! with the layout.

use crate::category::CategoryLabel;
use crate::nodes::VisualNode;
use crate::palette::{darker, ColorPalette};
use crate::scale::ease_cubic_in_out;
use crate::simulation::TickObserver;
use plotters::style::RGBColor;
use std::collections::HashMap;

const FALLBACK_FILL: RGBColor = RGBColor(0x7f, 0x7f, 0x7f);

/// A circle bound to one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: usize,
    pub group: String,
    pub target_radius: f64,
    pub fill: RGBColor,
    pub stroke: RGBColor,
    pub cx: f64,
    pub cy: f64,
    pub visible: bool,
    /// Clock time the entrance transition started.
    pub entered_at: f64,
}

impl Bubble {
    /// Resting stroke color.
    pub fn base_stroke(&self) -> RGBColor {
        darker(self.fill)
    }

    /// Radius at clock time `now_ms`, growing from 0 over `duration_ms`.
    pub fn radius_at(&self, now_ms: f64, duration_ms: f64) -> f64 {
        if duration_ms <= 0.0 {
            return self.target_radius;
        }
        let t = (now_ms - self.entered_at) / duration_ms;
        self.target_radius * ease_cubic_in_out(t)
    }

    pub fn contains(&self, x: f64, y: f64, radius: f64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= radius * radius
    }
}

/// Concrete circle for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub id: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: RGBColor,
    pub stroke: RGBColor,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub stroke_width: u32,
    /// Back to front.
    pub circles: Vec<CircleShape>,
    pub labels: Vec<CategoryLabel>,
}

/// Circle primitives keyed by node id, in draw order.
#[derive(Debug, Clone, Default)]
pub struct BubbleLayer {
    bubbles: Vec<Bubble>,
    index: HashMap<usize, usize>,
    transition_ms: f64,
}

impl BubbleLayer {
    pub fn new(transition_ms: f64) -> Self {
        Self {
            transition_ms,
            ..Default::default()
        }
    }

    /// Join `nodes` against the current primitives by id.
    ///
    /// Existing primitives keep their colors, visibility and entrance time;
    /// new ones enter at `now_ms` with radius 0. Primitives without a node
    /// are dropped. Draw order follows `nodes`.
    pub fn bind(&mut self, nodes: &[VisualNode], palette: &ColorPalette, now_ms: f64) {
        let mut previous: HashMap<usize, Bubble> = self.bubbles.drain(..).map(|b| (b.id, b)).collect();

        self.bubbles = nodes
            .iter()
            .map(|node| match previous.remove(&node.id) {
                Some(mut bubble) => {
                    bubble.target_radius = node.radius;
                    bubble.cx = node.x();
                    bubble.cy = node.y();
                    bubble
                }
                None => {
                    let fill = palette.color(&node.group).unwrap_or(FALLBACK_FILL);
                    Bubble {
                        id: node.id,
                        group: node.group.clone(),
                        target_radius: node.radius,
                        fill,
                        stroke: darker(fill),
                        cx: node.x(),
                        cy: node.y(),
                        visible: true,
                        entered_at: now_ms,
                    }
                }
            })
            .collect();

        self.index = self
            .bubbles
            .iter()
            .enumerate()
            .map(|(pos, b)| (b.id, pos))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter()
    }

    pub fn get(&self, id: usize) -> Option<&Bubble> {
        self.index.get(&id).map(|&pos| &self.bubbles[pos])
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Bubble> {
        self.index.get(&id).map(|&pos| &mut self.bubbles[pos])
    }

    /// Top-most visible bubble under `(x, y)` at clock time `now_ms`.
    pub fn hit_test(&self, x: f64, y: f64, now_ms: f64) -> Option<usize> {
        self.bubbles
            .iter()
            .rev()
            .filter(|b| b.visible)
            .find(|b| b.contains(x, y, b.radius_at(now_ms, self.transition_ms)))
            .map(|b| b.id)
    }

    /// Visible circles at clock time `now_ms`, back to front.
    pub fn circles(&self, now_ms: f64) -> Vec<CircleShape> {
        self.bubbles
            .iter()
            .filter(|b| b.visible)
            .map(|b| CircleShape {
                id: b.id,
                cx: b.cx,
                cy: b.cy,
                r: b.radius_at(now_ms, self.transition_ms),
                fill: b.fill,
                stroke: b.stroke,
            })
            .collect()
    }
}

impl TickObserver for BubbleLayer {
    fn ticked(&mut self, nodes: &[VisualNode]) {
        for node in nodes {
            if let Some(&pos) = self.index.get(&node.id) {
                let bubble = &mut self.bubbles[pos];
                bubble.cx = node.x();
                bubble.cy = node.y();
            }
        }
    }
}
