//! Node Builder: turns raw records into positioned, sized bubble nodes.

use crate::category::Dimension;
use crate::config::ChartConfig;
use crate::data::RawRecord;
use crate::scale::{domain_max, RadiusScale};
use rand::Rng;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Visual descriptor for one record.
///
/// Position is written only by the layout engine once the node has been
/// handed to it; everything else is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: usize,
    pub radius: f64,
    pub value: f64,
    pub name: String,
    pub org: String,
    pub group: String,
    pub fuel: String,
    pub doors: String,
    pub fuel_system: String,
    pub body_style: String,
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl VisualNode {
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// The node's key in a categorical dimension.
    pub fn category(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Fuel => &self.fuel,
            Dimension::Doors => &self.doors,
            Dimension::FuelSystem => &self.fuel_system,
            Dimension::BodyStyle => &self.body_style,
        }
    }
}

/// Coerce a textual amount to a number.
///
/// Surrounding whitespace is ignored and an empty string is zero. Text that
/// does not parse, or parses to a non-finite value, is also zero; callers
/// get `None` back alongside so they can report it.
pub fn coerce_amount(raw: &str) -> (f64, Option<&str>) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (0.0, None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => (v, None),
        _ => (0.0, Some(trimmed)),
    }
}

/// Build nodes for `records`, sorted by descending value.
///
/// Ties keep their input order, so the z-order of equal bubbles is stable.
pub fn build_nodes<R: Rng>(records: &[RawRecord], config: &ChartConfig, rng: &mut R) -> Vec<VisualNode> {
    let values: Vec<f64> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let (value, rejected) = coerce_amount(&record.total_amount);
            if let Some(text) = rejected {
                warn!(row = idx, total_amount = text, "unparseable total_amount, using 0");
            }
            value
        })
        .collect();

    let scale = RadiusScale::new(
        config.radius_exponent,
        domain_max(values.iter().copied()),
        config.radius_range,
        config.size_factor * config.width,
    );

    let (spawn_w, spawn_h) = config.spawn;
    let mut nodes: Vec<VisualNode> = records
        .iter()
        .zip(values)
        .enumerate()
        .map(|(id, (record, value))| VisualNode {
            id,
            radius: scale.radius(value),
            value,
            name: record.group.clone(),
            org: record.group.clone(),
            group: record.group.clone(),
            fuel: record.fuel.clone(),
            doors: record.doors.clone(),
            fuel_system: record.fuel_system.clone(),
            body_style: record.body_style.clone(),
            x: rng.gen::<f64>() * spawn_w,
            y: rng.gen::<f64>() * spawn_h,
        })
        .collect();

    // Large bubbles first so small ones are drawn on top.
    nodes.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    debug!(nodes = nodes.len(), "built nodes");
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(records: &[RawRecord]) -> Vec<VisualNode> {
        let mut rng = StdRng::seed_from_u64(42);
        build_nodes(records, &ChartConfig::default(), &mut rng)
    }

    #[test]
    fn test_sort_descending_stable() {
        let records = vec![
            RawRecord::new("a", "100"),
            RawRecord::new("b", "400"),
            RawRecord::new("a", "100"),
        ];
        let nodes = build(&records);

        let order: Vec<(usize, &str, f64)> = nodes
            .iter()
            .map(|n| (n.id, n.group.as_str(), n.value))
            .collect();
        assert_eq!(order, vec![(1, "b", 400.0), (0, "a", 100.0), (2, "a", 100.0)]);
        assert!(nodes[0].radius > nodes[1].radius);
        assert!(nodes[0].radius > nodes[2].radius);
        assert_eq!(nodes[1].radius, nodes[2].radius);
    }

    #[test]
    fn test_signed_zero_amounts_tie() {
        let nodes = build(&[RawRecord::new("a", "-0"), RawRecord::new("b", "0")]);
        assert_eq!(nodes[0].value, nodes[1].value);
        let ids: Vec<usize> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_radius_uses_width_factor() {
        let nodes = build(&[RawRecord::new("a", "400"), RawRecord::new("b", "0")]);
        assert!((nodes[0].radius - 30.0 * 0.96).abs() < 1e-9);
        assert!((nodes[1].radius - 2.0 * 0.96).abs() < 1e-9);
    }

    #[test]
    fn test_labels_and_attributes_copied() {
        let records = vec![RawRecord::new("audi", "13950")
            .with_fuel("diesel")
            .with_doors("four")
            .with_fuel_system("idi")
            .with_body_style("sedan")];
        let node = &build(&records)[0];
        assert_eq!(node.name, "audi");
        assert_eq!(node.org, "audi");
        assert_eq!(node.group, "audi");
        assert_eq!(node.category(Dimension::Fuel), "diesel");
        assert_eq!(node.category(Dimension::Doors), "four");
        assert_eq!(node.category(Dimension::FuelSystem), "idi");
        assert_eq!(node.category(Dimension::BodyStyle), "sedan");
    }

    #[test]
    fn test_initial_positions_in_spawn_rect() {
        let records: Vec<RawRecord> = (0..50).map(|i| RawRecord::new("a", &i.to_string())).collect();
        for node in build(&records) {
            assert!((0.0..900.0).contains(&node.x()));
            assert!((0.0..800.0).contains(&node.y()));
        }
    }

    #[test]
    fn test_same_seed_same_positions() {
        let records = vec![RawRecord::new("a", "1"), RawRecord::new("b", "2")];
        assert_eq!(build(&records), build(&records));
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("42"), (42.0, None));
        assert_eq!(coerce_amount(" 1.5 "), (1.5, None));
        assert_eq!(coerce_amount(""), (0.0, None));
        assert_eq!(coerce_amount("n/a"), (0.0, Some("n/a")));
        assert_eq!(coerce_amount("inf"), (0.0, Some("inf")));
    }

    #[test]
    fn test_bad_amount_becomes_zero() {
        let nodes = build(&[RawRecord::new("a", "?"), RawRecord::new("b", "10")]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].group, "a");
        assert_eq!(nodes[1].value, 0.0);
        assert!((nodes[1].radius - 1.92).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_amounts() {
        let nodes = build(&[RawRecord::new("a", "0"), RawRecord::new("b", "")]);
        assert!(nodes.iter().all(|n| (n.radius - 1.92).abs() < 1e-9));
    }

    #[test]
    fn test_empty_input() {
        assert!(build(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_order_is_non_increasing_and_stable(amounts in proptest::collection::vec(0u32..20, 0..40)) {
            let records: Vec<RawRecord> = amounts
                .iter()
                .map(|a| RawRecord::new("g", &a.to_string()))
                .collect();
            let nodes = build(&records);
            prop_assert_eq!(nodes.len(), records.len());
            for pair in nodes.windows(2) {
                prop_assert!(pair[0].value >= pair[1].value);
                if pair[0].value == pair[1].value {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }
    }
}
