//! Plot areas: view limits, autoscale state, artists, and per-area routing.

use std::sync::Arc;

use web_time::Instant;

use crate::artist::{ArtistId, Line2D};
use crate::axis::{AxisConfig, AxisScaling, LinearTicks, TickProvider};
use crate::config::InteractionConfig;
use crate::error::{PlotError, PlotResult};
use crate::events::{Channel, InputRouter, MouseButton, MouseEvent, PlotEvent, SubscriptionId};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::render::{
    LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextAlign, TextStyle,
    build_line_segments, build_scatter_points,
};
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::{Range, Viewport};

const TICK_LENGTH_PX: f64 = 5.0;
const TICK_LABEL_GAP_PX: f64 = 3.0;
const TICK_LABEL_SIZE: f32 = 11.0;
const SCATTER_MARKER_SIZE: f32 = 6.0;

/// Stable handle for a plot area, issued by its figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(u64);

impl AreaId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, unique within the issuing figure.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One plot area inside a figure.
///
/// Committed limits always have positive, finite span on both axes: collapsed
/// ranges are padded before they are stored.
#[derive(Debug)]
pub struct PlotArea {
    id: AreaId,
    bounds: ScreenRect,
    viewport: Viewport,
    x_scaling: AxisScaling,
    y_scaling: AxisScaling,
    artists: Vec<Line2D>,
    router: InputRouter,
    x_axis: AxisConfig,
    y_axis: AxisConfig,
    ticks: Arc<dyn TickProvider>,
    expander: f64,
    pub(crate) subplot: bool,
}

impl PlotArea {
    pub(crate) fn new(id: AreaId, bounds: ScreenRect, config: &InteractionConfig) -> Self {
        Self {
            id,
            bounds: bounds.normalized(),
            viewport: Viewport::default(),
            x_scaling: AxisScaling::Auto,
            y_scaling: AxisScaling::Auto,
            artists: Vec::new(),
            router: InputRouter::new(id, config),
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            ticks: Arc::new(LinearTicks),
            expander: config.nonsingular_expander,
            subplot: false,
        }
    }

    /// Access the handle.
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// Pixel rectangle covered by the area.
    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: ScreenRect) {
        self.bounds = bounds.normalized();
    }

    /// Whether `pixel` lies inside the area, edges included.
    pub fn contains(&self, pixel: ScreenPoint) -> bool {
        self.bounds.contains(pixel)
    }

    /// Current limits on both axes.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current x limits as `(min, max)`.
    pub fn get_xlim(&self) -> (f64, f64) {
        (self.viewport.x.min, self.viewport.x.max)
    }

    /// Current y limits as `(min, max)`.
    pub fn get_ylim(&self) -> (f64, f64) {
        (self.viewport.y.min, self.viewport.y.max)
    }

    /// Limit mode of the x axis.
    pub fn x_scaling(&self) -> AxisScaling {
        self.x_scaling
    }

    /// Limit mode of the y axis.
    pub fn y_scaling(&self) -> AxisScaling {
        self.y_scaling
    }

    /// Set the x limits, fixing the axis.
    ///
    /// `None` keeps the current bound. Reversed bounds are swapped and a
    /// collapsed range is padded.
    pub fn set_xlim(&mut self, lo: Option<f64>, hi: Option<f64>) -> PlotResult<()> {
        let range = merge_limits(self.viewport.x, lo, hi)?;
        self.viewport.x = range.nonsingular(self.expander);
        self.x_scaling = AxisScaling::Fixed;
        Ok(())
    }

    /// Set the y limits, fixing the axis. See [`set_xlim`](Self::set_xlim).
    pub fn set_ylim(&mut self, lo: Option<f64>, hi: Option<f64>) -> PlotResult<()> {
        let range = merge_limits(self.viewport.y, lo, hi)?;
        self.viewport.y = range.nonsingular(self.expander);
        self.y_scaling = AxisScaling::Fixed;
        Ok(())
    }

    /// Replace both ranges at once and fix both axes.
    ///
    /// Nothing is written unless both ranges and their spans are finite.
    pub fn set_view(&mut self, viewport: Viewport) -> PlotResult<()> {
        if !has_finite_span(viewport.x) || !has_finite_span(viewport.y) {
            return Err(PlotError::InvalidArgument(format!(
                "limits must be finite, got {viewport:?}"
            )));
        }
        self.viewport = viewport.nonsingular(self.expander);
        self.x_scaling = AxisScaling::Fixed;
        self.y_scaling = AxisScaling::Fixed;
        Ok(())
    }

    /// Plot `ys` against `xs` as a new line.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> PlotResult<ArtistId> {
        let line = Line2D::new(xs, ys)?;
        Ok(self.add_line(line))
    }

    /// Draw unconnected markers at each `(x, y)` pair.
    pub fn scatter(&mut self, xs: &[f64], ys: &[f64]) -> PlotResult<ArtistId> {
        let markers = Line2D::new(xs, ys)?
            .with_marker(SCATTER_MARKER_SIZE)
            .without_line();
        Ok(self.add_line(markers))
    }

    /// Plot `ys` against their sample indices.
    pub fn plot_y(&mut self, ys: &[f64]) -> ArtistId {
        self.add_line(Line2D::from_y(ys))
    }

    /// Append a prepared line and autoscale the axes that still follow data.
    pub fn add_line(&mut self, line: Line2D) -> ArtistId {
        let first = self.artists.is_empty();
        if self.x_scaling.is_auto()
            && let Some(range) = line.x_range()
        {
            self.viewport.x = self.grow(self.viewport.x, range, first);
        }
        if self.y_scaling.is_auto()
            && let Some(range) = line.y_range()
        {
            self.viewport.y = self.grow(self.viewport.y, range, first);
        }
        let id = line.id();
        self.artists.push(line);
        id
    }

    fn grow(&self, current: Range, data: Range, first: bool) -> Range {
        let next = if first {
            data
        } else {
            Range::union(current, data).unwrap_or(current)
        };
        if !has_finite_span(next) {
            tracing::trace!(area = ?self.id, ?next, "autoscale span overflows, keeping limits");
            return current;
        }
        next.nonsingular(self.expander)
    }

    /// Artists in draw order.
    pub fn artists(&self) -> &[Line2D] {
        &self.artists
    }

    /// Look up an artist.
    pub fn artist(&self, id: ArtistId) -> Option<&Line2D> {
        self.artists.iter().find(|artist| artist.id() == id)
    }

    /// Look up an artist mutably.
    pub fn artist_mut(&mut self, id: ArtistId) -> Option<&mut Line2D> {
        self.artists.iter_mut().find(|artist| artist.id() == id)
    }

    /// Remove an artist. Limits are left as they are.
    pub fn remove_artist(&mut self, id: ArtistId) -> PlotResult<Line2D> {
        let index = self
            .artists
            .iter()
            .position(|artist| artist.id() == id)
            .ok_or(PlotError::UnknownArtist(id))?;
        Ok(self.artists.remove(index))
    }

    /// X axis presentation.
    pub fn x_axis(&self) -> &AxisConfig {
        &self.x_axis
    }

    /// Y axis presentation.
    pub fn y_axis(&self) -> &AxisConfig {
        &self.y_axis
    }

    /// Replace the x axis presentation.
    pub fn set_x_axis(&mut self, axis: AxisConfig) {
        self.x_axis = axis;
    }

    /// Replace the y axis presentation.
    pub fn set_y_axis(&mut self, axis: AxisConfig) {
        self.y_axis = axis;
    }

    /// Replace the tick provider used when drawing.
    pub fn set_tick_provider(&mut self, provider: Arc<dyn TickProvider>) {
        self.ticks = provider;
    }

    /// Build the data to pixel transform for the current limits and bounds.
    pub fn transform(&self) -> PlotResult<Transform> {
        Transform::new(self.viewport, self.bounds)
    }

    /// Subscribe to this area's events.
    pub fn on(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&PlotEvent) + 'static,
    ) -> SubscriptionId {
        self.router.on(channel, callback)
    }

    /// Remove a subscription made on this area.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.router.off(id)
    }

    /// Access the router.
    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Data coordinates of the last known pointer, if it is inside the area.
    pub fn cursor_position(&self) -> Option<Point> {
        let pixel = self.router.last_pointer()?;
        if !self.contains(pixel) {
            return None;
        }
        self.transform().ok().map(|transform| transform.to_data(pixel))
    }

    /// Coordinate read-out using the axis formatters.
    pub fn format_coord(&self, point: Point) -> String {
        format!(
            "x={} y={}",
            self.x_axis.formatter().format(point.x),
            self.y_axis.formatter().format(point.y)
        )
    }

    pub(crate) fn route_press(
        &mut self,
        pixel: ScreenPoint,
        button: MouseButton,
        now: Instant,
    ) -> Option<MouseEvent> {
        let transform = self.routing_transform()?;
        self.router
            .press(pixel, button, now, &transform, &self.artists)
    }

    pub(crate) fn route_release(
        &mut self,
        pixel: ScreenPoint,
        button: MouseButton,
    ) -> Option<MouseEvent> {
        self.router.end_press();
        let transform = self.routing_transform()?;
        self.router.release(pixel, button, &transform)
    }

    pub(crate) fn route_motion(&mut self, pixel: ScreenPoint) -> Option<MouseEvent> {
        self.router.track_pointer(pixel);
        let transform = self.routing_transform()?;
        self.router.motion(pixel, &transform)
    }

    fn routing_transform(&self) -> Option<Transform> {
        match self.transform() {
            Ok(transform) => Some(transform),
            Err(err) => {
                tracing::warn!(area = ?self.id, %err, "dropping pointer event");
                None
            }
        }
    }

    /// Append this area's drawing commands to `out`.
    pub(crate) fn draw(&self, out: &mut RenderList, theme: &Theme) {
        out.push(RenderCommand::Rect {
            rect: self.bounds,
            style: RectStyle::filled(theme.axes_background),
        });

        match self.transform() {
            Ok(transform) => {
                out.push(RenderCommand::ClipRect(self.bounds));
                self.draw_artists(out, &transform);
                out.push(RenderCommand::ClipEnd);
                out.push(RenderCommand::Rect {
                    rect: self.bounds,
                    style: RectStyle::outlined(theme.frame, 1.0),
                });
                self.draw_ticks(out, &transform, theme);
            }
            Err(err) => {
                tracing::trace!(area = ?self.id, %err, "skipping area contents");
                out.push(RenderCommand::Rect {
                    rect: self.bounds,
                    style: RectStyle::outlined(theme.frame, 1.0),
                });
            }
        }
    }

    fn draw_artists(&self, out: &mut RenderList, transform: &Transform) {
        let mut segments = Vec::new();
        let mut markers = Vec::new();
        for artist in self.artists.iter().filter(|artist| artist.is_visible()) {
            if let Some(style) = artist.line_style() {
                build_line_segments(artist.points(), transform, self.bounds, &mut segments);
                if !segments.is_empty() {
                    out.push(RenderCommand::LineSegments {
                        segments: std::mem::take(&mut segments),
                        style,
                    });
                }
            }
            if let Some(style) = artist.marker_style() {
                build_scatter_points(artist.points(), transform, self.bounds, &mut markers);
                if !markers.is_empty() {
                    out.push(RenderCommand::Points {
                        points: std::mem::take(&mut markers),
                        style,
                    });
                }
            }
        }
    }

    fn draw_ticks(&self, out: &mut RenderList, transform: &Transform, theme: &Theme) {
        let bounds = self.bounds;
        let mut marks = Vec::new();
        let label_style = |align| TextStyle {
            color: theme.text,
            size: TICK_LABEL_SIZE,
            align,
        };

        let x_ticks = self
            .ticks
            .ticks(self.viewport.x, bounds.width(), self.x_axis.formatter());
        for tick in x_ticks {
            let x = transform.to_pixel(Point::new(tick.value, self.viewport.y.min)).x;
            marks.push(LineSegment::new(
                ScreenPoint::new(x, bounds.max.y),
                ScreenPoint::new(x, bounds.max.y + TICK_LENGTH_PX),
            ));
            if tick.major && !tick.label.is_empty() {
                out.push(RenderCommand::Text {
                    position: ScreenPoint::new(x, bounds.max.y + TICK_LENGTH_PX + TICK_LABEL_GAP_PX),
                    text: tick.label,
                    style: label_style(TextAlign::Center),
                });
            }
        }

        let y_ticks = self
            .ticks
            .ticks(self.viewport.y, bounds.height(), self.y_axis.formatter());
        for tick in y_ticks {
            let y = transform.to_pixel(Point::new(self.viewport.x.min, tick.value)).y;
            marks.push(LineSegment::new(
                ScreenPoint::new(bounds.min.x - TICK_LENGTH_PX, y),
                ScreenPoint::new(bounds.min.x, y),
            ));
            if tick.major && !tick.label.is_empty() {
                out.push(RenderCommand::Text {
                    position: ScreenPoint::new(
                        bounds.min.x - TICK_LENGTH_PX - TICK_LABEL_GAP_PX,
                        y - f64::from(TICK_LABEL_SIZE) / 2.0,
                    ),
                    text: tick.label,
                    style: label_style(TextAlign::Right),
                });
            }
        }

        if !marks.is_empty() {
            out.push(RenderCommand::LineSegments {
                segments: marks,
                style: LineStyle {
                    color: theme.frame,
                    width: 1.0,
                },
            });
        }

        let label_offset = TICK_LENGTH_PX + TICK_LABEL_GAP_PX * 2.0 + f64::from(TICK_LABEL_SIZE);
        if let Some(label) = self.x_axis.label() {
            out.push(RenderCommand::Text {
                position: ScreenPoint::new(
                    (bounds.min.x + bounds.max.x) / 2.0,
                    bounds.max.y + label_offset,
                ),
                text: label.to_string(),
                style: label_style(TextAlign::Center),
            });
        }
        // No rotated text, so the y label sits above the axis.
        if let Some(label) = self.y_axis.label() {
            out.push(RenderCommand::Text {
                position: ScreenPoint::new(
                    bounds.min.x,
                    bounds.min.y - TICK_LABEL_GAP_PX - f64::from(TICK_LABEL_SIZE),
                ),
                text: label.to_string(),
                style: label_style(TextAlign::Center),
            });
        }
    }
}

fn merge_limits(current: Range, lo: Option<f64>, hi: Option<f64>) -> PlotResult<Range> {
    let lo = lo.unwrap_or(current.min);
    let hi = hi.unwrap_or(current.max);
    let range = Range::new(lo, hi);
    if !has_finite_span(range) {
        return Err(PlotError::InvalidArgument(format!(
            "limits must be finite, got ({lo}, {hi})"
        )));
    }
    Ok(range)
}

fn has_finite_span(range: Range) -> bool {
    range.is_finite() && range.span().is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlotArea {
        PlotArea::new(
            AreaId::from_raw(1),
            ScreenRect::from_origin_size(80.0, 20.0, 700.0, 520.0),
            &InteractionConfig::default(),
        )
    }

    #[test]
    fn first_line_sets_exact_limits() {
        let mut area = area();
        area.plot(&[0.0, 10.0], &[-2.0, 3.0]).unwrap();
        assert_eq!(area.get_xlim(), (0.0, 10.0));
        assert_eq!(area.get_ylim(), (-2.0, 3.0));
    }

    #[test]
    fn autoscale_only_grows() {
        let mut area = area();
        area.plot(&[0.0, 10.0], &[0.0, 10.0]).unwrap();
        area.plot(&[-5.0, 5.0], &[2.0, 3.0]).unwrap();
        assert_eq!(area.get_xlim(), (-5.0, 10.0));
        assert_eq!(area.get_ylim(), (0.0, 10.0));
    }

    #[test]
    fn autoscale_ignores_non_finite_and_empty_data() {
        let mut area = area();
        area.plot(&[0.0, f64::NAN, 4.0], &[1.0, 2.0, f64::INFINITY])
            .unwrap();
        assert_eq!(area.get_xlim(), (0.0, 4.0));
        assert_eq!(area.get_ylim(), (1.0, 2.0));
        area.plot(&[], &[]).unwrap();
        assert_eq!(area.get_xlim(), (0.0, 4.0));
    }

    #[test]
    fn single_value_is_padded() {
        let mut area = area();
        area.plot(&[2.0, 2.0], &[0.0, 0.0]).unwrap();
        let (lo, hi) = area.get_xlim();
        assert!((lo - 1.9).abs() < 1e-12 && (hi - 2.1).abs() < 1e-12);
        assert_eq!(area.get_ylim(), (-0.05, 0.05));
    }

    #[test]
    fn fixed_axis_ignores_new_data() {
        let mut area = area();
        area.set_xlim(Some(0.0), Some(1.0)).unwrap();
        area.plot(&[0.0, 100.0], &[0.0, 100.0]).unwrap();
        assert_eq!(area.get_xlim(), (0.0, 1.0));
        assert_eq!(area.get_ylim(), (0.0, 100.0));
        assert_eq!(area.x_scaling(), AxisScaling::Fixed);
        assert_eq!(area.y_scaling(), AxisScaling::Auto);
    }

    #[test]
    fn set_lim_keeps_missing_bound_and_normalizes() {
        let mut area = area();
        area.set_xlim(None, Some(5.0)).unwrap();
        assert_eq!(area.get_xlim(), (0.0, 5.0));
        area.set_ylim(Some(3.0), Some(-1.0)).unwrap();
        assert_eq!(area.get_ylim(), (-1.0, 3.0));
        area.set_ylim(Some(0.0), Some(0.0)).unwrap();
        assert_eq!(area.get_ylim(), (-0.05, 0.05));
        assert!(area.set_xlim(Some(f64::NAN), None).is_err());
        assert_eq!(area.get_xlim(), (0.0, 5.0));
    }

    #[test]
    fn mismatched_plot_creates_nothing() {
        let mut area = area();
        assert!(area.plot(&[1.0, 2.0], &[1.0]).is_err());
        assert!(area.artists().is_empty());
        assert_eq!(area.get_xlim(), (0.0, 1.0));
    }

    #[test]
    fn remove_unknown_artist_fails() {
        let mut area = area();
        let id = area.plot_y(&[1.0, 2.0]);
        assert!(area.remove_artist(id).is_ok());
        assert!(matches!(
            area.remove_artist(id),
            Err(PlotError::UnknownArtist(missing)) if missing == id
        ));
    }

    #[test]
    fn cursor_position_tracks_pointer_inside() {
        let mut area = area();
        area.set_view(Viewport::new(Range::new(0.0, 700.0), Range::new(0.0, 520.0)))
            .unwrap();
        assert!(area.cursor_position().is_none());
        area.route_motion(ScreenPoint::new(80.0, 540.0));
        assert_eq!(area.cursor_position(), Some(Point::new(0.0, 0.0)));
        area.route_motion(ScreenPoint::new(10.0, 10.0));
        assert!(area.cursor_position().is_none());
    }

    #[test]
    fn draw_clips_artists_between_background_and_frame() {
        let mut area = area();
        area.plot(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let mut out = RenderList::new();
        area.draw(&mut out, &Theme::default());
        let commands = out.commands();
        assert!(matches!(commands[0], RenderCommand::Rect { .. }));
        assert!(matches!(commands[1], RenderCommand::ClipRect(_)));
        assert!(matches!(commands[2], RenderCommand::LineSegments { .. }));
        assert!(matches!(commands[3], RenderCommand::ClipEnd));
        assert!(matches!(commands[4], RenderCommand::Rect { .. }));
        assert!(
            commands
                .iter()
                .any(|command| matches!(command, RenderCommand::Text { .. }))
        );
    }

    #[test]
    fn invisible_artists_are_not_drawn() {
        let mut area = area();
        let id = area.plot(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        area.artist_mut(id).unwrap().set_visible(false);
        let mut out = RenderList::new();
        area.draw(&mut out, &Theme::default());
        assert!(matches!(out.commands()[2], RenderCommand::ClipEnd));
    }

    #[test]
    fn autoscale_never_commits_an_infinite_span() {
        let mut area = area();
        area.plot(&[-1e308, 1e308], &[0.0, 1.0]).unwrap();
        assert_eq!(area.get_xlim(), (0.0, 1.0));
        assert_eq!(area.get_ylim(), (0.0, 1.0));
        assert!(area.transform().is_ok());

        area.plot(&[0.0, 1e308], &[0.0, 1.0]).unwrap();
        area.plot(&[-1e308, 0.0], &[0.0, 1.0]).unwrap();
        assert_eq!(area.get_xlim(), (0.0, 1e308));
        let mut out = RenderList::new();
        area.draw(&mut out, &Theme::default());
    }

    #[test]
    fn limits_with_infinite_span_are_rejected() {
        let mut area = area();
        assert!(matches!(
            area.set_xlim(Some(-1e308), Some(1e308)),
            Err(PlotError::InvalidArgument(_))
        ));
        let huge = Viewport::new(Range::new(-1e308, 1e308), Range::new(0.0, 1.0));
        assert!(area.set_view(huge).is_err());
        assert_eq!(area.get_xlim(), (0.0, 1.0));
        assert_eq!(area.x_scaling(), AxisScaling::Auto);
    }

    #[test]
    fn scatter_draws_markers_only_and_autoscales() {
        let mut area = area();
        let id = area.scatter(&[1.0, 3.0], &[2.0, 8.0]).unwrap();
        assert_eq!(area.get_xlim(), (1.0, 3.0));
        assert_eq!(area.get_ylim(), (2.0, 8.0));
        let markers = area.artist(id).unwrap();
        assert!(markers.line_style().is_none());
        assert!(markers.marker_style().is_some());
        assert!(area.scatter(&[1.0], &[]).is_err());
    }

    #[test]
    fn axis_labels_are_drawn() {
        let mut area = area();
        area.set_x_axis(AxisConfig::new().with_label("time"));
        area.set_y_axis(AxisConfig::new().with_label("volts"));
        let mut out = RenderList::new();
        area.draw(&mut out, &Theme::default());
        let texts: Vec<&str> = out
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"time"));
        assert!(texts.contains(&"volts"));
    }
}
