//! Pan and zoom math shared by the navigation toolbar.
//!
//! These helpers are pure: they take the frozen gesture anchor and return the
//! limits to commit, leaving targeting and state to the caller.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Range, Viewport};

/// Pan a viewport by the pixel delta accumulated since the gesture started.
///
/// `anchor` and `bounds` are captured at press time, so repeated calls with
/// the same delta always produce the same limits. Dragging right moves the
/// view left in data space; dragging down moves it up.
pub(crate) fn pan_viewport(
    anchor: Viewport,
    bounds: ScreenRect,
    delta_pixels: ScreenPoint,
) -> Viewport {
    let dx = delta_pixels.x / bounds.width() * anchor.x.span();
    let dy = -delta_pixels.y / bounds.height() * anchor.y.span();
    anchor.translated(dx, dy)
}

/// Convert a zoom drag, in data coordinates, into new limits.
///
/// Returns `None` when the rectangle is thinner than `min_extent` on both
/// axes. Otherwise both axes take the dragged extent, which may be collapsed
/// and is padded when committed.
pub(crate) fn zoom_to_rect(start: Point, end: Point, min_extent: f64) -> Option<Viewport> {
    let wide = (end.x - start.x).abs() >= min_extent;
    let tall = (end.y - start.y).abs() >= min_extent;
    if !wide && !tall {
        return None;
    }
    Some(Viewport::new(Range::new(start.x, end.x), Range::new(start.y, end.y)))
}

/// Normalized pixel rectangle spanned by a drag.
pub(crate) fn drag_rect(start: ScreenPoint, end: ScreenPoint) -> ScreenRect {
    ScreenRect::new(start, end).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0))
    }

    fn bounds() -> ScreenRect {
        ScreenRect::from_origin_size(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn pan_without_motion_is_identity() {
        let panned = pan_viewport(viewport(), bounds(), ScreenPoint::new(0.0, 0.0));
        assert_eq!(panned, viewport());
    }

    #[test]
    fn pan_moves_opposite_to_drag_in_x_and_with_it_in_y() {
        let panned = pan_viewport(viewport(), bounds(), ScreenPoint::new(10.0, 20.0));
        assert_eq!(panned.x, Range::new(-1.0, 9.0));
        assert_eq!(panned.y, Range::new(2.0, 12.0));
    }

    #[test]
    fn zoom_rect_orders_corners() {
        let zoomed = zoom_to_rect(Point::new(6.0, 1.0), Point::new(2.0, 5.0), 0.01)
            .expect("large enough");
        assert_eq!(zoomed.x, Range::new(2.0, 6.0));
        assert_eq!(zoomed.y, Range::new(1.0, 5.0));
    }

    #[test]
    fn zoom_rect_rejects_clicks() {
        assert!(zoom_to_rect(Point::new(5.0, 5.0), Point::new(5.005, 5.005), 0.01).is_none());
    }

    #[test]
    fn zoom_rect_takes_thin_axis_extent() {
        let zoomed = zoom_to_rect(Point::new(2.0, 5.0), Point::new(4.0, 5.001), 0.01)
            .expect("x is wide enough");
        assert_eq!(zoomed.x, Range::new(2.0, 4.0));
        assert_eq!(zoomed.y, Range::new(5.0, 5.001));
    }

    #[test]
    fn drag_rect_is_normalized() {
        let rect = drag_rect(ScreenPoint::new(50.0, 10.0), ScreenPoint::new(20.0, 40.0));
        assert_eq!(rect.min, ScreenPoint::new(20.0, 10.0));
        assert_eq!(rect.max, ScreenPoint::new(50.0, 40.0));
    }
}
