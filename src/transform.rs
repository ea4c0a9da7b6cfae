//! Coordinate transforms between data and screen space.

use crate::error::{Axis, PlotError, PlotResult};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::Viewport;

/// Transform from data coordinates into screen coordinates for one plot area.
///
/// Construction validates both ranges and the pixel rectangle, so every
/// mapping afterwards is finite for finite input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    pub fn new(viewport: Viewport, screen: ScreenRect) -> PlotResult<Self> {
        if !viewport.x.is_valid() || !(screen.width() > 0.0) || !screen.width().is_finite() {
            return Err(PlotError::DegenerateTransform { axis: Axis::X });
        }
        if !viewport.y.is_valid() || !(screen.height() > 0.0) || !screen.height().is_finite() {
            return Err(PlotError::DegenerateTransform { axis: Axis::Y });
        }
        Ok(Self { viewport, screen })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data point into screen space.
    pub fn to_pixel(&self, point: Point) -> ScreenPoint {
        let x_norm = (point.x - self.viewport.x.min) / self.viewport.x.span();
        let y_norm = (point.y - self.viewport.y.min) / self.viewport.y.span();
        ScreenPoint::new(
            self.screen.min.x + x_norm * self.screen.width(),
            self.screen.min.y + (1.0 - y_norm) * self.screen.height(),
        )
    }

    /// Map a screen point into data space. Points outside the rectangle are
    /// extrapolated, not clamped.
    pub fn to_data(&self, point: ScreenPoint) -> Point {
        let x_norm = (point.x - self.screen.min.x) / self.screen.width();
        let y_norm = 1.0 - (point.y - self.screen.min.y) / self.screen.height();
        Point::new(
            self.viewport.x.min + x_norm * self.viewport.x.span(),
            self.viewport.y.min + y_norm * self.viewport.y.span(),
        )
    }

    /// Map a slice of data points into screen space.
    pub fn to_pixels(&self, points: &[Point]) -> Vec<ScreenPoint> {
        points.iter().map(|point| self.to_pixel(*point)).collect()
    }

    /// Map parallel x/y slices into screen space.
    ///
    /// Returns [`PlotError::InvalidArgument`] when the lengths differ.
    pub fn to_pixels_xy(&self, xs: &[f64], ys: &[f64]) -> PlotResult<Vec<ScreenPoint>> {
        if xs.len() != ys.len() {
            return Err(PlotError::InvalidArgument(format!(
                "x and y must have the same length ({} != {})",
                xs.len(),
                ys.len()
            )));
        }
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(x, y)| self.to_pixel(Point::new(*x, *y)))
            .collect())
    }

    /// Data-space size of one pixel along each axis.
    pub fn data_per_pixel(&self) -> (f64, f64) {
        (
            self.viewport.x.span() / self.screen.width(),
            self.viewport.y.span() / self.screen.height(),
        )
    }
}
