//! Category dimensions and their static layout configuration.
//!
//! Each categorical dimension a chart can split on maps every known key to
//! an attraction center and a label position. The maps are derived from the
//! canvas size only, never from data.

use crate::error::ChartError;
use std::fmt;
use std::str::FromStr;

/// A point in chart coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Categorical columns the chart can split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Fuel,
    Doors,
    FuelSystem,
    BodyStyle,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Fuel,
        Dimension::Doors,
        Dimension::FuelSystem,
        Dimension::BodyStyle,
    ];

    /// The column name this dimension is read from.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Fuel => "fuel",
            Dimension::Doors => "doors",
            Dimension::FuelSystem => "fuel-system",
            Dimension::BodyStyle => "bodyStyle",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| ChartError::UnknownMode(s.to_string()))
    }
}

/// What the horizontal attraction force pulls towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Every node is pulled to the chart center.
    #[default]
    Grouped,
    /// Nodes are pulled to the center of their category in a dimension.
    Split(Dimension),
}

impl FromStr for DisplayMode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(DisplayMode::Grouped)
        } else {
            s.parse().map(DisplayMode::Split)
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Grouped => f.write_str("all"),
            DisplayMode::Split(dim) => f.write_str(dim.key()),
        }
    }
}

/// A category title and where it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
struct DimensionLayout {
    // Both lists keep display order.
    centers: Vec<(String, Point)>,
    labels: Vec<(String, f64)>,
}

/// Attraction centers and label positions for every dimension.
#[derive(Debug, Clone)]
pub struct CategoryLayout {
    center: Point,
    label_y: f64,
    fuel: DimensionLayout,
    doors: DimensionLayout,
    fuel_system: DimensionLayout,
    body_style: DimensionLayout,
}

impl CategoryLayout {
    /// Build the layout for a `width` x `height` canvas.
    pub fn new(width: f64, height: f64, label_offset: f64, label_y: f64) -> Self {
        let w = width;
        let o = label_offset;
        let cy = height / 2.0;
        let at = |x: f64| Point::new(x, cy);

        let fuel = DimensionLayout {
            centers: named(vec![("gas", at(w / 3.0)), ("diesel", at(2.0 * w / 3.0))]),
            labels: named(vec![("gas", 160.0), ("diesel", w - 160.0)]),
        };

        let doors = DimensionLayout {
            centers: named(vec![("two", at(w / 3.0)), ("four", at(2.0 * w / 3.0))]),
            labels: named(vec![("two", 160.0), ("four", w - 160.0)]),
        };

        let fuel_system = DimensionLayout {
            centers: named(vec![
                ("mpfi", at(1.2 * w / 5.0)),
                ("idi", at(0.0)),
                ("spdi", at(1.6 * w / 5.0)),
                ("4bbl", at(2.0 * w / 5.0)),
                ("mfi", at(2.5 * w / 5.0)),
                ("2bbl", at(3.0 * w / 5.0)),
                ("1bbl", at(3.3 * w / 5.0)),
                ("spfi", at(3.8 * w / 5.0)),
            ]),
            labels: named(vec![
                ("mpfi", w / 5.0 + o),
                ("idi", -w / 5.0 + o),
                ("spdi", w / 5.0 * 2.0 + o),
                ("4bbl", w / 5.0 * 2.3 + o),
                ("mfi", w / 5.0 * 2.6 + o),
                ("2bbl", w / 5.0 * 3.2 + o),
                ("1bbl", w / 5.0 * 4.0 + o),
                ("spfi", w / 5.0 * 4.5 + o),
            ]),
        };

        let body_style = DimensionLayout {
            centers: named(vec![
                ("hardtop", at(w / 5.0 + 50.0)),
                ("sedan", at(1.8 * w / 5.0)),
                ("convertible", at(2.3 * w / 5.0)),
                ("wagon", at(3.0 * w / 5.0)),
                ("hatchback", at(3.5 * w / 5.0)),
            ]),
            labels: named(vec![
                ("hardtop", o),
                ("sedan", w / 5.0 * 1.2 + o),
                ("convertible", w / 5.0 * 2.4 + o),
                ("wagon", w / 5.0 * 3.1 + o),
                ("hatchback", w / 5.0 * 3.8 + o),
            ]),
        };

        Self {
            center: Point::new(width / 2.0, cy),
            label_y,
            fuel,
            doors,
            fuel_system,
            body_style,
        }
    }

    /// The single center used in grouped mode.
    pub fn center(&self) -> Point {
        self.center
    }

    fn dimension(&self, dim: Dimension) -> &DimensionLayout {
        match dim {
            Dimension::Fuel => &self.fuel,
            Dimension::Doors => &self.doors,
            Dimension::FuelSystem => &self.fuel_system,
            Dimension::BodyStyle => &self.body_style,
        }
    }

    /// Every attraction center of `dim`, in display order.
    pub fn centers(&self, dim: Dimension) -> &[(String, Point)] {
        &self.dimension(dim).centers
    }

    /// Attraction center for `key` within `dim`.
    pub fn category_center(&self, dim: Dimension, key: &str) -> Result<Point, ChartError> {
        self.dimension(dim)
            .centers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| *p)
            .ok_or_else(|| ChartError::UnknownCategory {
                dimension: dim,
                key: key.to_string(),
            })
    }

    /// Horizontal label position for `key` within `dim`.
    pub fn label_x(&self, dim: Dimension, key: &str) -> Result<f64, ChartError> {
        self.dimension(dim)
            .labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, x)| *x)
            .ok_or_else(|| ChartError::UnknownCategory {
                dimension: dim,
                key: key.to_string(),
            })
    }

    /// Every label of `dim`, in display order.
    pub fn labels(&self, dim: Dimension) -> Vec<CategoryLabel> {
        self.dimension(dim)
            .labels
            .iter()
            .map(|(text, x)| CategoryLabel {
                text: text.clone(),
                x: *x,
                y: self.label_y,
            })
            .collect()
    }
}

fn named<T>(entries: Vec<(&str, T)>) -> Vec<(String, T)> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CategoryLayout {
        CategoryLayout::new(960.0, 600.0, 50.0, 40.0)
    }

    #[test]
    fn test_parse_display_mode() {
        assert_eq!("all".parse::<DisplayMode>().unwrap(), DisplayMode::Grouped);
        assert_eq!(
            "fuel-system".parse::<DisplayMode>().unwrap(),
            DisplayMode::Split(Dimension::FuelSystem)
        );
        assert_eq!(
            "bodyStyle".parse::<DisplayMode>().unwrap(),
            DisplayMode::Split(Dimension::BodyStyle)
        );
    }

    #[test]
    fn test_parse_display_mode_rejects_unknown() {
        let err = "year".parse::<DisplayMode>().unwrap_err();
        assert!(matches!(err, ChartError::UnknownMode(ref m) if m == "year"));
        // Case matters: column names are matched verbatim.
        assert!("ALL".parse::<DisplayMode>().is_err());
        assert!("bodystyle".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_display_mode_round_trips_through_display() {
        for dim in Dimension::ALL {
            let mode = DisplayMode::Split(dim);
            assert_eq!(mode.to_string().parse::<DisplayMode>().unwrap(), mode);
        }
        assert_eq!(DisplayMode::Grouped.to_string(), "all");
    }

    #[test]
    fn test_category_centers() {
        let layout = layout();
        assert_eq!(layout.center(), Point::new(480.0, 300.0));
        assert_eq!(
            layout.category_center(Dimension::Fuel, "gas").unwrap(),
            Point::new(320.0, 300.0)
        );
        assert_eq!(
            layout.category_center(Dimension::Fuel, "diesel").unwrap(),
            Point::new(640.0, 300.0)
        );
        assert_eq!(
            layout.category_center(Dimension::BodyStyle, "hardtop").unwrap().x,
            242.0
        );
        assert_eq!(layout.category_center(Dimension::FuelSystem, "idi").unwrap().x, 0.0);
    }

    #[test]
    fn test_unknown_category_fails() {
        let layout = layout();
        let err = layout.category_center(Dimension::Doors, "three").unwrap_err();
        assert!(matches!(
            err,
            ChartError::UnknownCategory { dimension: Dimension::Doors, ref key } if key == "three"
        ));
        // Keys do not leak across dimensions.
        assert!(layout.category_center(Dimension::Fuel, "two").is_err());
        assert!(layout.label_x(Dimension::Fuel, "sedan").is_err());
    }

    #[test]
    fn test_labels_keep_display_order() {
        let layout = layout();
        let labels = layout.labels(Dimension::BodyStyle);
        let names: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(names, vec!["hardtop", "sedan", "convertible", "wagon", "hatchback"]);
        assert!(labels.iter().all(|l| l.y == 40.0));
        assert_eq!(labels[0].x, 50.0);

        let fuel = layout.labels(Dimension::Fuel);
        assert_eq!(fuel[1].x, 800.0);
        assert_eq!(layout.label_x(Dimension::FuelSystem, "idi").unwrap(), -142.0);
    }
}
