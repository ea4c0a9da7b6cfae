//! Data ranges and the visible viewport of a plot area.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Smallest range covering every finite value, if there is one.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut range: Option<Range> = None;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            match range.as_mut() {
                None => range = Some(Range::new(value, value)),
                Some(existing) => existing.expand_to_include(value),
            }
        }
        range
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has finite bounds and a finite, positive span.
    pub fn is_valid(&self) -> bool {
        let span = self.span();
        self.is_finite() && span.is_finite() && span > 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Union two ranges if both are finite.
    pub fn union(a: Self, b: Self) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        Some(Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        })
    }

    /// Shift both bounds by `delta`.
    pub fn translated(&self, delta: f64) -> Self {
        Self {
            min: self.min - delta,
            max: self.max - delta,
        }
    }

    /// Pad a zero-width range so it can drive a transform.
    ///
    /// A collapsed range at `v` becomes `[v - e|v|, v + e|v|]`, or `[-e, e]`
    /// when `v == 0`, with `e = expander`. Ranges with positive span are
    /// returned untouched.
    pub fn nonsingular(&self, expander: f64) -> Self {
        let largest = self.min.abs().max(self.max.abs());
        if self.span() > largest * f64::EPSILON {
            return *self;
        }
        if largest == 0.0 {
            return Self {
                min: -expander,
                max: expander,
            };
        }
        Self {
            min: self.min - expander * self.min.abs(),
            max: self.max + expander * self.max.abs(),
        }
    }
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Shift the viewport by a data-space delta.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x.translated(dx),
            y: self.y.translated(dy),
        }
    }

    /// Apply [`Range::nonsingular`] to both axes.
    pub fn nonsingular(&self, expander: f64) -> Self {
        Self {
            x: self.x.nonsingular(expander),
            y: self.y.nonsingular(expander),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_swaps_reversed_bounds() {
        let range = Range::new(5.0, -1.0);
        assert_eq!(range, Range { min: -1.0, max: 5.0 });
    }

    #[test]
    fn from_values_skips_non_finite() {
        let range = Range::from_values([f64::NAN, 3.0, -2.0, f64::INFINITY, 7.5]).unwrap();
        assert_eq!(range, Range::new(-2.0, 7.5));
        assert!(Range::from_values([f64::NAN]).is_none());
        assert!(Range::from_values(std::iter::empty()).is_none());
    }

    #[test]
    fn nonsingular_pads_collapsed_ranges() {
        let padded = Range::new(2.0, 2.0).nonsingular(0.05);
        assert!((padded.min - 1.9).abs() < 1e-12);
        assert!((padded.max - 2.1).abs() < 1e-12);

        let zero = Range::new(0.0, 0.0).nonsingular(0.05);
        assert_eq!(zero, Range::new(-0.05, 0.05));

        let negative = Range::new(-4.0, -4.0).nonsingular(0.05);
        assert!(negative.is_valid());
        assert!((negative.min + 4.2).abs() < 1e-12);
    }

    #[test]
    fn overflowing_span_is_invalid() {
        let range = Range::new(-1e308, 1e308);
        assert!(range.is_finite());
        assert!(!range.is_valid());
    }

    #[test]
    fn nonsingular_keeps_valid_ranges() {
        let range = Range::new(0.0, 1e-3);
        assert_eq!(range.nonsingular(0.05), range);
    }

    #[test]
    fn translate_moves_both_bounds() {
        let view = Viewport::new(Range::new(0.0, 10.0), Range::new(-1.0, 1.0));
        let moved = view.translated(2.0, -0.5);
        assert_eq!(moved.x, Range::new(-2.0, 8.0));
        assert_eq!(moved.y, Range::new(-0.5, 1.5));
    }
}
