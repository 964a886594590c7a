/// Continuous power scale from `[0, domain_max]` onto `range`.
///
/// With exponent 0.5 the encoded area, not the radius, grows linearly with
/// the input value.
#[derive(Debug, Clone, PartialEq)]
pub struct PowScale {
    exponent: f64,
    domain: (f64, f64),
    range: (f64, f64),
}

impl PowScale {
    pub fn new(exponent: f64, domain_max: f64, range: (f64, f64)) -> Self {
        Self {
            exponent,
            domain: (0.0, domain_max),
            range,
        }
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map `value` into the range. Inputs outside the domain are clamped, and
    /// a degenerate domain maps everything to the range minimum.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = (self.transform(self.domain.0), self.transform(self.domain.1));
        let (r0, r1) = self.range;

        if !(d1 > d0) || value.is_nan() {
            return r0;
        }

        let t = ((self.transform(value) - d0) / (d1 - d0)).clamp(0.0, 1.0);
        r0 + t * (r1 - r0)
    }

    fn transform(&self, v: f64) -> f64 {
        // Sign-preserving power, matching the usual pow-scale definition.
        v.signum() * v.abs().powf(self.exponent)
    }
}

/// Radius scale for bubbles: a power scale followed by a pixel size factor.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusScale {
    inner: PowScale,
    pixels: f64,
}

impl RadiusScale {
    /// `pixels` is the width-derived factor (`width * size_factor`).
    pub fn new(exponent: f64, domain_max: f64, range: (f64, f64), pixels: f64) -> Self {
        Self {
            inner: PowScale::new(exponent, domain_max, range),
            pixels,
        }
    }

    pub fn radius(&self, value: f64) -> f64 {
        self.inner.scale(value) * self.pixels
    }

    pub fn bounds(&self) -> (f64, f64) {
        let (r0, r1) = self.inner.range();
        (r0 * self.pixels, r1 * self.pixels)
    }
}

/// Largest finite value, or 0 for an empty input.
pub fn domain_max<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Standard cubic in-out easing on `t` in `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
