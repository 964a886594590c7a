//! Legend, toolbar and tooltip state, and the handlers that mutate bubbles.

use crate::category::DisplayMode;
use crate::error::ChartError;
use crate::format::add_commas;
use crate::nodes::VisualNode;
use crate::palette::{ColorPalette, ALL_CATEGORIES, CAR_MAKES};
use crate::render::BubbleLayer;
use plotters::style::{RGBColor, BLACK};
use std::fmt;

/// Stroke used to highlight the hovered bubble.
pub const HOVER_STROKE: RGBColor = BLACK;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    pub color: Option<RGBColor>,
    pub selected: bool,
}

/// Category legend; clicking an entry filters the bubbles.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// One entry per car make, `ALL` first. Makes that only appear in the
    /// data get a color from `palette` but no entry.
    pub fn new(palette: &ColorPalette) -> Self {
        let entries = CAR_MAKES
            .iter()
            .map(|&key| LegendEntry {
                key: key.to_string(),
                color: palette.color(key),
                selected: false,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&str> {
        self.entries.iter().find(|e| e.selected).map(|e| e.key.as_str())
    }

    /// Select `key`, clear every other entry and apply the filter to
    /// `bubbles`. Returns the number of bubbles left visible.
    pub fn click(
        &mut self,
        key: &str,
        mode: DisplayMode,
        nodes: &[VisualNode],
        bubbles: &mut BubbleLayer,
    ) -> usize {
        for entry in self.entries.iter_mut() {
            entry.selected = entry.key == key;
        }
        filter_bubbles(key, mode, nodes, bubbles)
    }
}

/// Whether `node` passes the legend filter `key`.
///
/// `ALL` passes everything. Otherwise the node's group must equal `key`, or,
/// while split, its key in the split dimension.
pub fn matches_filter(node: &VisualNode, key: &str, mode: DisplayMode) -> bool {
    if key == ALL_CATEGORIES || node.group == key {
        return true;
    }
    match mode {
        DisplayMode::Split(dim) => node.category(dim) == key,
        DisplayMode::Grouped => false,
    }
}

/// Apply the legend filter `key` to every bubble. Returns how many stay
/// visible.
pub fn filter_bubbles(key: &str, mode: DisplayMode, nodes: &[VisualNode], bubbles: &mut BubbleLayer) -> usize {
    let mut visible = 0;
    for node in nodes {
        if let Some(bubble) = bubbles.get_mut(node.id) {
            bubble.visible = matches_filter(node, key, mode);
            if bubble.visible {
                visible += 1;
            }
        }
    }
    visible
}

/// Toolbar buttons that switch the display mode.
pub const TOOLBAR_BUTTONS: [&str; 5] = ["all", "fuel", "doors", "fuel-system", "bodyStyle"];

#[derive(Debug, Clone, PartialEq)]
pub struct Toolbar {
    active: String,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self {
            active: TOOLBAR_BUTTONS[0].to_string(),
        }
    }
}

impl Toolbar {
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Resolve a button id to a mode and mark it active. Unknown ids leave
    /// the active button untouched.
    pub fn click(&mut self, id: &str) -> Result<DisplayMode, ChartError> {
        let mode = id.parse::<DisplayMode>()?;
        self.active = id.to_string();
        Ok(mode)
    }
}

/// Details shown for a hovered bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub name: String,
    pub value: f64,
    pub fuel: String,
}

impl TooltipContent {
    pub fn for_node(node: &VisualNode) -> Self {
        Self {
            name: node.name.clone(),
            value: node.value,
            fuel: node.fuel.clone(),
        }
    }

    pub fn amount(&self) -> String {
        format!("${}", add_commas(self.value))
    }

    /// Markup for an HTML tooltip.
    pub fn to_html(&self) -> String {
        format!(
            "<span class=\"name\">Brand Name: </span><span class=\"value\">{}</span><br/>\
             <span class=\"name\">Amount: </span><span class=\"value\">{}</span><br/>\
             <span class=\"name\">Fuel-type: </span><span class=\"value\">{}</span>",
            self.name,
            self.amount(),
            self.fuel
        )
    }
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Brand Name: {}\nAmount: {}\nFuel-type: {}",
            self.name,
            self.amount(),
            self.fuel
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub content: TooltipContent,
    pub x: f64,
    pub y: f64,
}

/// Hover highlight and the floating tooltip.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    hovered: Option<usize>,
    tooltip: Option<Tooltip>,
    offset: (f64, f64),
}

impl HoverState {
    pub fn new(offset: (f64, f64)) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Highlight the bubble bound to `node` and show its tooltip near the
    /// pointer. A previously hovered bubble is released first.
    pub fn hover_in(&mut self, node: &VisualNode, pointer: (f64, f64), bubbles: &mut BubbleLayer) {
        if let Some(prev) = self.hovered.filter(|&prev| prev != node.id) {
            self.hover_out(prev, bubbles);
        }
        if let Some(bubble) = bubbles.get_mut(node.id) {
            bubble.stroke = HOVER_STROKE;
        }
        self.hovered = Some(node.id);
        self.tooltip = Some(Tooltip {
            content: TooltipContent::for_node(node),
            x: pointer.0 + self.offset.0,
            y: pointer.1 + self.offset.1,
        });
    }

    /// Restore the stroke of bubble `id` and hide the tooltip.
    pub fn hover_out(&mut self, id: usize, bubbles: &mut BubbleLayer) {
        if let Some(bubble) = bubbles.get_mut(id) {
            bubble.stroke = bubble.base_stroke();
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::RawRecord;
    use crate::nodes::build_nodes;
    use crate::palette::darker;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(groups: &[&str]) -> (Vec<VisualNode>, BubbleLayer, ColorPalette) {
        let records: Vec<RawRecord> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| RawRecord::new(g, &(1000 * (i + 1)).to_string()).with_fuel("gas"))
            .collect();
        let nodes = build_nodes(&records, &ChartConfig::default(), &mut StdRng::seed_from_u64(9));
        let palette = ColorPalette::car_makes();
        let mut layer = BubbleLayer::new(2000.0);
        layer.bind(&nodes, &palette, 0.0);
        (nodes, layer, palette)
    }

    #[test]
    fn test_legend_filter() {
        let (nodes, mut layer, palette) = setup(&["audi", "bmw", "audi", "volvo"]);
        let mut legend = Legend::new(&palette);

        let visible = legend.click("audi", DisplayMode::Grouped, &nodes, &mut layer);
        let expected = nodes.iter().filter(|n| n.group == "audi").count();
        assert_eq!(visible, expected);
        for b in layer.iter() {
            assert_eq!(b.visible, b.group == "audi");
        }
        assert_eq!(legend.selected(), Some("audi"));

        assert_eq!(legend.click(ALL_CATEGORIES, DisplayMode::Grouped, &nodes, &mut layer), nodes.len());
        assert!(layer.iter().all(|b| b.visible));
        assert_eq!(legend.selected(), Some("ALL"));
        assert_eq!(legend.entries().iter().filter(|e| e.selected).count(), 1);
    }

    #[test]
    fn test_split_key_filters_while_split() {
        let (mut nodes, mut layer, palette) = setup(&["audi", "bmw", "volvo"]);
        nodes[0].fuel = "diesel".to_string();
        let mut legend = Legend::new(&palette);

        let split = "fuel".parse::<DisplayMode>().unwrap();
        assert_eq!(legend.click("diesel", split, &nodes, &mut layer), 1);
        assert!(layer.get(nodes[0].id).unwrap().visible);
        assert!(!layer.get(nodes[1].id).unwrap().visible);
        assert!(!layer.get(nodes[2].id).unwrap().visible);

        // Grouped mode only filters by brand.
        assert_eq!(legend.click("diesel", DisplayMode::Grouped, &nodes, &mut layer), 0);
    }

    #[test]
    fn test_legend_entries_follow_palette() {
        let legend = Legend::new(&ColorPalette::car_makes());
        assert_eq!(legend.entries().len(), 23);
        assert_eq!(legend.entries()[0].key, "ALL");
        assert!(legend.entries().iter().all(|e| e.color.is_some() && !e.selected));
        assert_eq!(legend.selected(), None);
    }

    #[test]
    fn test_legend_ignores_makes_outside_the_list() {
        let mut palette = ColorPalette::car_makes();
        palette.extend("tesla".to_string());
        let legend = Legend::new(&palette);
        assert_eq!(legend.entries().len(), 23);
        assert_eq!(legend.entries().last().map(|e| e.key.as_str()), Some("volvo"));
        assert!(legend.entries().iter().all(|e| e.key != "tesla"));
    }

    #[test]
    fn test_legend_click_on_absent_category_hides_all() {
        let (nodes, mut layer, palette) = setup(&["audi"]);
        let mut legend = Legend::new(&palette);
        assert_eq!(legend.click("porsche", DisplayMode::Grouped, &nodes, &mut layer), 0);
    }

    #[test]
    fn test_toolbar() {
        let mut toolbar = Toolbar::default();
        assert_eq!(toolbar.active(), "all");
        assert_eq!(
            toolbar.click("fuel-system").unwrap(),
            "fuel-system".parse::<DisplayMode>().unwrap()
        );
        assert_eq!(toolbar.active(), "fuel-system");
        assert!(toolbar.click("year").is_err());
        assert_eq!(toolbar.active(), "fuel-system");
        assert_eq!(toolbar.click("all").unwrap(), DisplayMode::Grouped);
    }

    #[test]
    fn test_tooltip_content() {
        let (nodes, _, _) = setup(&["audi"]);
        let node = &nodes[0];
        let content = TooltipContent {
            value: 1234567.89,
            ..TooltipContent::for_node(node)
        };
        assert_eq!(content.amount(), "$1,234,567.89");
        assert_eq!(
            content.to_string(),
            "Brand Name: audi\nAmount: $1,234,567.89\nFuel-type: gas"
        );
        let html = content.to_html();
        assert!(html.contains("<span class=\"value\">audi</span>"));
        assert!(html.contains("$1,234,567.89"));
    }

    #[test]
    fn test_hover_in_and_out() {
        let (nodes, mut layer, _) = setup(&["audi", "bmw"]);
        let mut hover = HoverState::new((20.0, 20.0));

        hover.hover_in(&nodes[0], (100.0, 50.0), &mut layer);
        assert_eq!(layer.get(nodes[0].id).unwrap().stroke, HOVER_STROKE);
        let tip = hover.tooltip().unwrap();
        assert_eq!((tip.x, tip.y), (120.0, 70.0));
        assert_eq!(tip.content.name, nodes[0].name);

        // Moving onto another bubble releases the first.
        hover.hover_in(&nodes[1], (10.0, 10.0), &mut layer);
        let first = layer.get(nodes[0].id).unwrap();
        assert_eq!(first.stroke, darker(first.fill));
        assert_eq!(hover.hovered(), Some(nodes[1].id));

        hover.hover_out(nodes[1].id, &mut layer);
        let second = layer.get(nodes[1].id).unwrap();
        assert_eq!(second.stroke, darker(second.fill));
        assert!(hover.tooltip().is_none());
        assert_eq!(hover.hovered(), None);
    }
}
