//! Line artists: the data, styling, and hit geometry of one plotted series.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{PlotError, PlotResult};
use crate::geom::{Point, ScreenPoint, distance_sq, segment_distance_sq};
use crate::render::{LineStyle, MarkerStyle};
use crate::style::Color;
use crate::transform::Transform;
use crate::view::Range;

static ARTIST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable handle for an artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistId(u64);

impl ArtistId {
    fn next() -> Self {
        Self(ARTIST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Pick behavior for an artist.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Picker {
    /// Never emits pick events.
    #[default]
    Disabled,
    /// Pickable with the figure's default tolerance.
    Default,
    /// Pickable within the given pixel radius.
    Radius(f64),
}

/// A polyline with optional markers.
#[derive(Debug, Clone)]
pub struct Line2D {
    id: ArtistId,
    points: Vec<Point>,
    line: Option<LineStyle>,
    marker: Option<MarkerStyle>,
    label: Option<String>,
    visible: bool,
    picker: Picker,
}

impl Line2D {
    /// Create a solid line through parallel x/y values.
    ///
    /// Fails with [`PlotError::InvalidArgument`] when the lengths differ.
    pub fn new(xs: &[f64], ys: &[f64]) -> PlotResult<Self> {
        Ok(Self {
            id: ArtistId::next(),
            points: zip_points(xs, ys)?,
            line: Some(LineStyle::default()),
            marker: None,
            label: None,
            visible: true,
            picker: Picker::Disabled,
        })
    }

    /// Create a line whose x values are the sample indices `0..len`.
    pub fn from_y(ys: &[f64]) -> Self {
        let points = ys
            .iter()
            .enumerate()
            .map(|(index, y)| Point::new(index as f64, *y))
            .collect();
        Self {
            id: ArtistId::next(),
            points,
            line: Some(LineStyle::default()),
            marker: None,
            label: None,
            visible: true,
            picker: Picker::Disabled,
        }
    }

    /// Set the color of both the stroke and the markers.
    pub fn with_color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    /// Set the stroke width.
    pub fn with_linewidth(mut self, width: f32) -> Self {
        if let Some(line) = self.line.as_mut() {
            line.width = width;
        }
        self
    }

    /// Draw circle markers of the given diameter at every point.
    pub fn with_marker(mut self, size: f32) -> Self {
        let color = self.color();
        self.marker = Some(MarkerStyle { color, size });
        self
    }

    /// Draw markers only, without connecting segments.
    pub fn without_line(mut self) -> Self {
        self.line = None;
        self
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the pick behavior.
    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    /// Access the artist handle.
    pub fn id(&self) -> ArtistId {
        self.id
    }

    /// Access the data points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Replace the data points.
    pub fn set_data(&mut self, xs: &[f64], ys: &[f64]) -> PlotResult<()> {
        self.points = zip_points(xs, ys)?;
        Ok(())
    }

    /// Stroke style, if the line is drawn.
    pub fn line_style(&self) -> Option<LineStyle> {
        self.line
    }

    /// Marker style, if markers are drawn.
    pub fn marker_style(&self) -> Option<MarkerStyle> {
        self.marker
    }

    /// Current color.
    pub fn color(&self) -> Color {
        self.line
            .map(|line| line.color)
            .or(self.marker.map(|marker| marker.color))
            .unwrap_or(Color::BLUE)
    }

    /// Change the stroke and marker color.
    pub fn set_color(&mut self, color: Color) {
        if let Some(line) = self.line.as_mut() {
            line.color = color;
        }
        if let Some(marker) = self.marker.as_mut() {
            marker.color = color;
        }
    }

    /// Access the label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Check if the artist is drawn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Access the pick behavior.
    pub fn picker(&self) -> Picker {
        self.picker
    }

    /// Change the pick behavior.
    pub fn set_picker(&mut self, picker: Picker) {
        self.picker = picker;
    }

    /// Range of the finite x values.
    pub fn x_range(&self) -> Option<Range> {
        Range::from_values(self.points.iter().map(|point| point.x))
    }

    /// Range of the finite y values.
    pub fn y_range(&self) -> Option<Range> {
        Range::from_values(self.points.iter().map(|point| point.y))
    }

    /// Indices of the points hit by a press at `cursor`.
    ///
    /// A point is hit when its marker center is within `tolerance` pixels; when
    /// the line is stroked, a segment within tolerance hits its start index.
    /// Returns an empty vector for a miss.
    pub(crate) fn hit_indices(
        &self,
        cursor: ScreenPoint,
        transform: &Transform,
        tolerance: f64,
    ) -> Vec<usize> {
        let tolerance_sq = tolerance * tolerance;
        let pixels: Vec<Option<ScreenPoint>> = self
            .points
            .iter()
            .map(|point| point.is_finite().then(|| transform.to_pixel(*point)))
            .collect();

        let mut hits = Vec::new();
        for (index, pixel) in pixels.iter().enumerate() {
            let Some(pixel) = pixel else {
                continue;
            };
            if distance_sq(*pixel, cursor) <= tolerance_sq {
                hits.push(index);
                continue;
            }
            if self.line.is_none() {
                continue;
            }
            if let Some(Some(next)) = pixels.get(index + 1)
                && segment_distance_sq(cursor, *pixel, *next) <= tolerance_sq
            {
                hits.push(index);
            }
        }
        hits
    }
}

fn zip_points(xs: &[f64], ys: &[f64]) -> PlotResult<Vec<Point>> {
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
        .map(|(x, y)| Point::new(*x, *y))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenRect;
    use crate::view::Viewport;

    fn transform() -> Transform {
        Transform::new(
            Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0)),
            ScreenRect::from_origin_size(0.0, 0.0, 100.0, 100.0),
        )
        .expect("valid transform")
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            Line2D::new(&[1.0, 2.0], &[1.0]),
            Err(PlotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn ids_are_unique() {
        let a = Line2D::from_y(&[1.0]);
        let b = Line2D::from_y(&[1.0]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn from_y_uses_sample_indices() {
        let line = Line2D::from_y(&[3.0, 1.0, 2.0]);
        assert_eq!(line.x_range(), Some(Range::new(0.0, 2.0)));
        assert_eq!(line.y_range(), Some(Range::new(1.0, 3.0)));
    }

    #[test]
    fn hit_on_vertex_and_segment() {
        let line = Line2D::new(&[0.0, 10.0], &[0.0, 10.0]).unwrap();
        let transform = transform();
        // (0,0) maps to (0,100); (10,10) maps to (100,0).
        assert_eq!(
            line.hit_indices(ScreenPoint::new(2.0, 99.0), &transform, 5.0),
            vec![0]
        );
        assert_eq!(
            line.hit_indices(ScreenPoint::new(50.0, 52.0), &transform, 5.0),
            vec![0]
        );
        assert!(
            line.hit_indices(ScreenPoint::new(50.0, 80.0), &transform, 5.0)
                .is_empty()
        );
    }

    #[test]
    fn markers_only_ignore_segments() {
        let line = Line2D::new(&[0.0, 10.0], &[0.0, 10.0])
            .unwrap()
            .with_marker(4.0)
            .without_line();
        let transform = transform();
        assert!(
            line.hit_indices(ScreenPoint::new(50.0, 50.0), &transform, 5.0)
                .is_empty()
        );
        assert_eq!(
            line.hit_indices(ScreenPoint::new(100.0, 3.0), &transform, 5.0),
            vec![1]
        );
    }

    #[test]
    fn color_applies_to_line_and_marker() {
        let line = Line2D::from_y(&[1.0, 2.0])
            .with_marker(6.0)
            .with_color(Color::BLACK);
        assert_eq!(line.line_style().map(|style| style.color), Some(Color::BLACK));
        assert_eq!(line.marker_style().map(|style| style.color), Some(Color::BLACK));
    }
}
