//! Immediate-mode drawing commands and the surface they are replayed onto.
//!
//! Plot areas never touch a drawing surface directly. Each redraw produces a
//! [`RenderList`] in pixel space, which a host replays onto its canvas through
//! the [`RenderSurface`] trait (or paints natively, as the GPUI backend does).

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::style::Color;
use crate::transform::Transform;

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            width: 1.5,
        }
    }
}

/// Marker styling. Markers are always filled circles.
///
/// Marker sizes are diameters in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker color.
    pub color: Color,
    /// Marker diameter in pixels.
    pub size: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            size: 6.0,
        }
    }
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width. Zero disables the outline.
    pub stroke_width: f32,
}

impl RectStyle {
    /// Filled rectangle without an outline.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        }
    }

    /// Outline-only rectangle.
    pub fn outlined(stroke: Color, stroke_width: f32) -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke,
            stroke_width,
        }
    }
}

impl Default for RectStyle {
    fn default() -> Self {
        Self::outlined(Color::BLACK, 1.0)
    }
}

/// Horizontal anchoring for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Position is the left edge.
    #[default]
    Left,
    /// Position is the horizontal center.
    Center,
    /// Position is the right edge.
    Right,
}

/// Text styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
    /// Horizontal alignment relative to the position.
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
            align: TextAlign::Left,
        }
    }
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw markers.
    Points {
        /// Marker centers.
        points: Vec<ScreenPoint>,
        /// Marker styling.
        style: MarkerStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text.
    Text {
        /// Text anchor position (baseline top).
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Pixel-space drawing primitives provided by a host canvas.
pub trait RenderSurface {
    /// Restrict subsequent drawing to `rect` until the matching [`end_clip`](Self::end_clip).
    fn clip_rect(&mut self, rect: ScreenRect);
    /// Pop the most recent clip.
    fn end_clip(&mut self);
    /// Stroke a batch of line segments.
    fn stroke_line(&mut self, segments: &[LineSegment], style: LineStyle);
    /// Draw filled circular markers.
    fn draw_markers(&mut self, centers: &[ScreenPoint], style: MarkerStyle);
    /// Fill and/or stroke a rectangle.
    fn fill_rect(&mut self, rect: ScreenRect, style: RectStyle);
    /// Draw a text run.
    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle);
}

/// Ordered render commands for one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Replay every command onto a surface, in order.
    pub fn replay(&self, surface: &mut dyn RenderSurface) {
        for command in &self.commands {
            match command {
                RenderCommand::ClipRect(rect) => surface.clip_rect(*rect),
                RenderCommand::ClipEnd => surface.end_clip(),
                RenderCommand::LineSegments { segments, style } => {
                    surface.stroke_line(segments, *style)
                }
                RenderCommand::Points { points, style } => surface.draw_markers(points, *style),
                RenderCommand::Rect { rect, style } => surface.fill_rect(*rect, *style),
                RenderCommand::Text {
                    position,
                    text,
                    style,
                } => surface.draw_text(*position, text, style),
            }
        }
    }
}

/// Build clipped line segments from data points.
pub(crate) fn build_line_segments(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    for window in points.windows(2) {
        if !window[0].is_finite() || !window[1].is_finite() {
            continue;
        }
        let start = transform.to_pixel(window[0]);
        let end = transform.to_pixel(window[1]);
        if let Some((clipped_start, clipped_end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(clipped_start, clipped_end));
        }
    }
}

/// Build clipped marker centers from data points.
pub(crate) fn build_scatter_points(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<ScreenPoint>,
) {
    out.clear();
    for point in points {
        if !point.is_finite() {
            continue;
        }
        let screen = transform.to_pixel(*point);
        if clip.contains(screen) {
            out.push(screen);
        }
    }
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let mut out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
    let mut out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (mut x, mut y) = (0.0_f64, 0.0_f64);

        if (out_code & TOP) != 0 {
            x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            y = rect.min.y;
        } else if (out_code & BOTTOM) != 0 {
            x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            y = rect.max.y;
        } else if (out_code & RIGHT) != 0 {
            y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            x = rect.max.x;
        } else if (out_code & LEFT) != 0 {
            y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            x = rect.min.x;
        }

        let new_point = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = new_point;
            out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
        } else {
            end = new_point;
            out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);
        }
    }
}

fn region_code(
    point: ScreenPoint,
    rect: ScreenRect,
    left: u8,
    right: u8,
    top: u8,
    bottom: u8,
) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= left;
    } else if point.x > rect.max.x {
        code |= right;
    }
    if point.y < rect.min.y {
        code |= top;
    } else if point.y > rect.max.y {
        code |= bottom;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Range, Viewport};

    #[test]
    fn clip_segment_inside() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let start = ScreenPoint::new(2.0, 2.0);
        let end = ScreenPoint::new(8.0, 8.0);
        let clipped = clip_segment(start, end, rect).expect("segment should clip");
        assert_eq!(clipped.0, start);
        assert_eq!(clipped.1, end);
    }

    #[test]
    fn clip_segment_crossing_edge() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let (start, end) =
            clip_segment(ScreenPoint::new(5.0, 5.0), ScreenPoint::new(15.0, 5.0), rect)
                .expect("segment should clip");
        assert_eq!(start, ScreenPoint::new(5.0, 5.0));
        assert_eq!(end, ScreenPoint::new(10.0, 5.0));
        assert!(
            clip_segment(ScreenPoint::new(11.0, 1.0), ScreenPoint::new(20.0, 2.0), rect).is_none()
        );
    }

    #[test]
    fn build_segments_skips_nan_gaps() {
        let viewport = Viewport::new(Range::new(0.0, 3.0), Range::new(0.0, 3.0));
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(30.0, 30.0));
        let transform = Transform::new(viewport, rect).expect("valid transform");
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, f64::NAN),
            Point::new(3.0, 3.0),
        ];
        let mut out = Vec::new();
        build_line_segments(&points, &transform, rect, &mut out);
        assert_eq!(out.len(), 1);

        let mut markers = Vec::new();
        build_scatter_points(&points, &transform, rect, &mut markers);
        assert_eq!(markers.len(), 3);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl RenderSurface for Recorder {
        fn clip_rect(&mut self, _rect: ScreenRect) {
            self.calls.push("clip");
        }
        fn end_clip(&mut self) {
            self.calls.push("end_clip");
        }
        fn stroke_line(&mut self, _segments: &[LineSegment], _style: LineStyle) {
            self.calls.push("stroke_line");
        }
        fn draw_markers(&mut self, _centers: &[ScreenPoint], _style: MarkerStyle) {
            self.calls.push("markers");
        }
        fn fill_rect(&mut self, _rect: ScreenRect, _style: RectStyle) {
            self.calls.push("rect");
        }
        fn draw_text(&mut self, _position: ScreenPoint, _text: &str, _style: &TextStyle) {
            self.calls.push("text");
        }
    }

    #[test]
    fn replay_preserves_order() {
        let rect = ScreenRect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let mut list = RenderList::new();
        list.push(RenderCommand::Rect {
            rect,
            style: RectStyle::filled(Color::WHITE),
        });
        list.push(RenderCommand::ClipRect(rect));
        list.push(RenderCommand::LineSegments {
            segments: vec![],
            style: LineStyle::default(),
        });
        list.push(RenderCommand::ClipEnd);
        list.push(RenderCommand::Text {
            position: ScreenPoint::new(1.0, 1.0),
            text: "0.5".into(),
            style: TextStyle::default(),
        });
        let mut recorder = Recorder::default();
        list.replay(&mut recorder);
        assert_eq!(
            recorder.calls,
            ["rect", "clip", "stroke_line", "end_clip", "text"]
        );
    }
}
