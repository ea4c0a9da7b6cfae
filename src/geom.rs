//! Geometric primitives used by the plotting pipeline.
//!
//! [`Point`] lives in data space. [`ScreenPoint`] and [`ScreenRect`] are in
//! drawing-surface pixels with y growing downward.

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// X value in pixels.
    pub x: f64,
    /// Y value in pixels.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another screen point.
    pub fn distance(&self, other: ScreenPoint) -> f64 {
        distance_sq(*self, other).sqrt()
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min: ScreenPoint::new(x, y),
            max: ScreenPoint::new(x + width, y + height),
        }
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive, finite area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0
            && self.height() > 0.0
            && self.width().is_finite()
            && self.height().is_finite()
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Rectangle with corners reordered so that `min <= max` on both axes.
    pub fn normalized(&self) -> Self {
        Self {
            min: ScreenPoint::new(self.min.x.min(self.max.x), self.min.y.min(self.max.y)),
            max: ScreenPoint::new(self.min.x.max(self.max.x), self.min.y.max(self.max.y)),
        }
    }
}

pub(crate) fn distance_sq(a: ScreenPoint, b: ScreenPoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Squared distance from `point` to the segment `start..end`.
pub(crate) fn segment_distance_sq(point: ScreenPoint, start: ScreenPoint, end: ScreenPoint) -> f64 {
    let seg_x = end.x - start.x;
    let seg_y = end.y - start.y;
    let len_sq = seg_x * seg_x + seg_y * seg_y;
    if len_sq == 0.0 {
        return distance_sq(point, start);
    }
    let t = (((point.x - start.x) * seg_x + (point.y - start.y) * seg_y) / len_sq).clamp(0.0, 1.0);
    let closest = ScreenPoint::new(start.x + t * seg_x, start.y + t * seg_y);
    distance_sq(point, closest)
}
