// Linear axis scaling from data space to pixel space

/// Linearly map `value` from `domain` onto `range`.
///
/// A degenerate domain (zero width, or bounds that make the ratio non-finite) maps every
/// value to the middle of the range, so flat series still plot on a single line.
pub fn scale(value: f64, domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> f64 {
    let span = domain_max - domain_min;
    let ratio = (value - domain_min) / span;
    if span == 0.0 || !span.is_finite() || !ratio.is_finite() {
        return range_min + (range_max - range_min) / 2.0;
    }
    range_min + ratio * (range_max - range_min)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        scale(value, self.domain.0, self.domain.1, self.range.0, self.range.1)
    }
}
