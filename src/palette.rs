use plotters::style::RGBColor;

/// The 20-color categorical scheme.
pub const CATEGORY20: [RGBColor; 20] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xae, 0xc7, 0xe8),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0xff, 0xbb, 0x78),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0x98, 0xdf, 0x8a),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0xff, 0x98, 0x96),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0xc5, 0xb0, 0xd5),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xc4, 0x9c, 0x94),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0xf7, 0xb6, 0xd2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xc7, 0xc7, 0xc7),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0xdb, 0xdb, 0x8d),
    RGBColor(0x17, 0xbe, 0xcf),
    RGBColor(0x9e, 0xda, 0xe5),
];

/// Legend sentinel that selects every category.
pub const ALL_CATEGORIES: &str = "ALL";

/// Car makes shown in the legend, in legend order. The sentinel comes first
/// so it takes the first scheme color.
pub const CAR_MAKES: [&str; 23] = [
    ALL_CATEGORIES,
    "alfa-romero",
    "audi",
    "bmw",
    "chevrolet",
    "dodge",
    "honda",
    "isuzu",
    "jaguar",
    "mazda",
    "mercedes-benz",
    "mercury",
    "mitsubishi",
    "nissan",
    "peugot",
    "plymouth",
    "porsche",
    "renault",
    "saab",
    "subaru",
    "toyota",
    "volkswagen",
    "volvo",
];

/// Ordinal color scale: the i-th domain key gets the i-th scheme color,
/// wrapping around the scheme.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    domain: Vec<String>,
    scheme: Vec<RGBColor>,
}

impl ColorPalette {
    pub fn new<I, S>(domain: I, scheme: &[RGBColor]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut palette = Self {
            domain: Vec::new(),
            scheme: scheme.to_vec(),
        };
        for key in domain {
            palette.extend(key.into());
        }
        palette
    }

    /// The default palette over the car-make legend.
    pub fn car_makes() -> Self {
        Self::new(CAR_MAKES, &CATEGORY20)
    }

    /// Add `key` to the domain if it is not there yet. Unknown keys claim the
    /// next color in first-seen order.
    pub fn extend(&mut self, key: String) {
        if !self.domain.contains(&key) {
            self.domain.push(key);
        }
    }

    pub fn color(&self, key: &str) -> Option<RGBColor> {
        if self.scheme.is_empty() {
            return None;
        }
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|idx| self.scheme[idx % self.scheme.len()])
    }
}

/// Darken a color by one step (each channel scaled by 0.7).
pub fn darker(color: RGBColor) -> RGBColor {
    let channel = |c: u8| (c as f64 * 0.7).round().clamp(0.0, 255.0) as u8;
    RGBColor(channel(color.0), channel(color.1), channel(color.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_order_assigns_colors() {
        let palette = ColorPalette::car_makes();
        assert_eq!(palette.color("ALL"), Some(CATEGORY20[0]));
        assert_eq!(palette.color("alfa-romero"), Some(CATEGORY20[1]));
        // 22nd key wraps around the 20-color scheme.
        assert_eq!(palette.color("volkswagen"), Some(CATEGORY20[1]));
        assert_eq!(palette.color("volvo"), Some(CATEGORY20[2]));
    }

    #[test]
    fn test_unknown_key_until_extended() {
        let mut palette = ColorPalette::car_makes();
        assert_eq!(palette.color("tesla"), None);
        palette.extend("tesla".to_string());
        assert_eq!(palette.color("tesla"), Some(CATEGORY20[23 % 20]));
        palette.extend("tesla".to_string());
        palette.extend("rivian".to_string());
        assert_eq!(palette.color("tesla"), Some(CATEGORY20[3]));
        assert_eq!(palette.color("rivian"), Some(CATEGORY20[4]));
    }

    #[test]
    fn test_darker() {
        assert_eq!(darker(RGBColor(100, 200, 0)), RGBColor(70, 140, 0));
        assert_eq!(darker(RGBColor(0, 0, 0)), RGBColor(0, 0, 0));
    }
}
