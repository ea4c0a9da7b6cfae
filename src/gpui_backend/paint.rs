use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    LineSegment, LineStyle, MarkerStyle, RectStyle, RenderList, RenderSurface, TextAlign,
    TextStyle,
};
use crate::style::Color;

/// Replays figure commands into a GPUI window, offset by the canvas origin.
pub(crate) struct GpuiSurface<'a> {
    window: &'a mut Window,
    cx: &'a mut App,
    origin: ScreenPoint,
    clip_stack: Vec<ContentMask<Pixels>>,
}

impl<'a> GpuiSurface<'a> {
    pub(crate) fn new(window: &'a mut Window, cx: &'a mut App, origin: ScreenPoint) -> Self {
        Self {
            window,
            cx,
            origin,
            clip_stack: Vec::new(),
        }
    }

    fn at(&self, point: ScreenPoint) -> gpui::Point<Pixels> {
        gpui::point(
            px((point.x + self.origin.x) as f32),
            px((point.y + self.origin.y) as f32),
        )
    }

    fn to_bounds(&self, rect: ScreenRect) -> Bounds<Pixels> {
        Bounds::from_corners(self.at(rect.min), self.at(rect.max))
    }

    fn with_clip(&mut self, f: impl FnOnce(&mut Window, &mut App)) {
        let cx = &mut *self.cx;
        match self.clip_stack.last() {
            Some(mask) => self
                .window
                .with_content_mask(Some(mask.clone()), |window| f(window, cx)),
            None => f(&mut *self.window, cx),
        }
    }
}

pub(crate) fn paint_frame(
    frame: &RenderList,
    origin: ScreenPoint,
    window: &mut Window,
    cx: &mut App,
) {
    let mut surface = GpuiSurface::new(window, cx, origin);
    frame.replay(&mut surface);
}

impl RenderSurface for GpuiSurface<'_> {
    fn clip_rect(&mut self, rect: ScreenRect) {
        let bounds = self.to_bounds(rect);
        self.clip_stack.push(ContentMask { bounds });
    }

    fn end_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn stroke_line(&mut self, segments: &[LineSegment], style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        let width = style.width.max(0.5);
        let mut builder = PathBuilder::stroke(px(width));
        for segment in segments {
            builder.move_to(self.at(segment.start));
            builder.line_to(self.at(segment.end));
        }
        if let Ok(path) = builder.build() {
            self.with_clip(|window, _| window.paint_path(path, to_rgba(style.color)));
        }
    }

    fn draw_markers(&mut self, centers: &[ScreenPoint], style: MarkerStyle) {
        if centers.is_empty() {
            return;
        }
        let radius = style.size.max(2.0) * 0.5;
        let quads: Vec<_> = centers
            .iter()
            .map(|center| {
                let center = self.at(*center);
                quad(
                    Bounds::from_corners(
                        point(center.x - px(radius), center.y - px(radius)),
                        point(center.x + px(radius), center.y + px(radius)),
                    ),
                    Corners::all(px(radius)),
                    to_rgba(style.color),
                    Edges::all(px(0.0)),
                    to_rgba(style.color),
                    BorderStyle::default(),
                )
            })
            .collect();
        self.with_clip(|window, _| {
            for marker in quads {
                window.paint_quad(marker);
            }
        });
    }

    fn fill_rect(&mut self, rect: ScreenRect, style: RectStyle) {
        let rect_quad = quad(
            self.to_bounds(rect),
            Corners::all(px(0.0)),
            to_rgba(style.fill),
            Edges::all(px(style.stroke_width)),
            to_rgba(style.stroke),
            BorderStyle::default(),
        );
        self.with_clip(|window, _| window.paint_quad(rect_quad));
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let origin = self.at(position);
        let style = style.clone();
        let text = text.to_string();
        self.with_clip(|window, cx| paint_text(window, cx, origin, text, &style));
    }
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    origin: gpui::Point<Pixels>,
    text: String,
    style: &TextStyle,
) {
    let font_size = px(style.size);
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.into(), font_size, &[run], None);
    let width = f32::from(shaped.width);
    let shift = match style.align {
        TextAlign::Left => px(0.0),
        TextAlign::Center => px(width / 2.0),
        TextAlign::Right => px(width),
    };
    let line_height = shaped.ascent + shaped.descent;
    let _ = shaped.paint(point(origin.x - shift, origin.y), line_height, window, cx);
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}
