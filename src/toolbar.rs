//! Navigation toolbar: the pan/zoom/home tool state machine.
//!
//! The toolbar is figure-wide. A gesture binds to the plot area under the
//! press and ignores continuation events that resolve anywhere else. Pan
//! deltas are measured from the press against limits and bounds frozen at
//! that moment.

use std::collections::HashMap;

use crate::axes::{AreaId, PlotArea};
use crate::config::InteractionConfig;
use crate::events::{MouseButton, MouseEvent, MouseEventKind};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::interaction::{drag_rect, pan_viewport, zoom_to_rect};
use crate::render::{RectStyle, RenderCommand, RenderList};
use crate::style::Theme;
use crate::view::Viewport;

/// Active navigation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer events only reach subscribers.
    #[default]
    None,
    /// Left-drag pans the area under the press.
    Pan,
    /// Left-drag selects a rectangle to zoom into.
    Zoom,
}

#[derive(Debug, Clone, Copy)]
struct PanAnchor {
    pixel: ScreenPoint,
    viewport: Viewport,
    bounds: ScreenRect,
}

#[derive(Debug, Clone, Copy)]
struct ZoomAnchor {
    data: Point,
    pixel: ScreenPoint,
}

/// Figure-wide pan/zoom/home controller.
#[derive(Debug, Clone)]
pub struct NavigationToolbar {
    tool: Tool,
    active_area: Option<AreaId>,
    home_views: HashMap<AreaId, Viewport>,
    pan: Option<PanAnchor>,
    zoom: Option<ZoomAnchor>,
    preview: Option<ScreenRect>,
    zoom_min_extent: f64,
    status: String,
}

impl NavigationToolbar {
    /// Create a toolbar with no registered areas.
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            tool: Tool::None,
            active_area: None,
            home_views: HashMap::new(),
            pan: None,
            zoom: None,
            preview: None,
            zoom_min_extent: config.zoom_min_extent,
            status: String::from("Ready"),
        }
    }

    /// Currently selected tool.
    pub fn active_tool(&self) -> Tool {
        self.tool
    }

    /// Area bound to the gesture in progress, if any.
    pub fn active_area(&self) -> Option<AreaId> {
        self.active_area
    }

    /// Zoom preview rectangle, visible while a zoom drag is in progress.
    pub fn preview_rect(&self) -> Option<ScreenRect> {
        self.preview
    }

    /// Home limits recorded for an area.
    pub fn home_view(&self, area: AreaId) -> Option<Viewport> {
        self.home_views.get(&area).copied()
    }

    /// Human-readable description of the last toolbar action.
    pub fn status_message(&self) -> &str {
        &self.status
    }

    /// Start managing an area, recording its current limits as home.
    ///
    /// Registering the same area again keeps the original home view.
    pub fn register(&mut self, area: &PlotArea) {
        self.home_views
            .entry(area.id())
            .or_insert_with(|| area.viewport());
    }

    /// Stop managing an area, abandoning a gesture bound to it.
    pub fn forget(&mut self, area: AreaId) {
        self.home_views.remove(&area);
        if self.active_area == Some(area) {
            self.cancel_gesture();
        }
    }

    /// Stop managing every area.
    pub fn forget_all(&mut self) {
        self.home_views.clear();
        self.cancel_gesture();
    }

    /// Toggle the pan tool. Returns `true` if a visible preview was dropped.
    pub fn activate_pan(&mut self) -> bool {
        self.toggle(Tool::Pan)
    }

    /// Toggle the zoom tool. Returns `true` if a visible preview was dropped.
    pub fn activate_zoom(&mut self) -> bool {
        self.toggle(Tool::Zoom)
    }

    fn toggle(&mut self, tool: Tool) -> bool {
        let next = if self.tool == tool { Tool::None } else { tool };
        self.set_tool(next)
    }

    /// Select a tool directly. Any gesture in progress is discarded.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        let had_preview = self.cancel_gesture();
        self.tool = tool;
        self.status = match tool {
            Tool::None => "Ready",
            Tool::Pan => "Pan: drag on a plot to move it",
            Tool::Zoom => "Zoom: drag on a plot to select a region",
        }
        .to_string();
        tracing::debug!(?tool, "navigation tool changed");
        had_preview
    }

    /// Restore every registered area to its home limits and deselect the tool.
    pub fn reset_home(&mut self, areas: &mut [PlotArea]) {
        self.cancel_gesture();
        self.tool = Tool::None;
        let mut restored = 0_usize;
        for area in areas.iter_mut() {
            let Some(home) = self.home_views.get(&area.id()).copied() else {
                continue;
            };
            match area.set_view(home) {
                Ok(()) => restored += 1,
                Err(err) => tracing::warn!(area = ?area.id(), %err, "home view rejected"),
            }
        }
        self.status = String::from("Reset to home view");
        tracing::debug!(restored, "home view restored");
    }

    /// Record the current limits of every area as its home view.
    pub fn update_home(&mut self, areas: &[PlotArea]) {
        for area in areas {
            self.home_views.insert(area.id(), area.viewport());
        }
    }

    /// Append the zoom preview, if visible, on top of a frame.
    pub fn draw_overlay(&self, out: &mut RenderList, theme: &Theme) {
        if let Some(rect) = self.preview {
            out.push(RenderCommand::Rect {
                rect,
                style: RectStyle {
                    fill: theme.zoom_rect_fill,
                    stroke: theme.zoom_rect,
                    stroke_width: 1.0,
                },
            });
        }
    }

    /// Feed a routed pointer event to the active tool.
    ///
    /// Returns `true` when limits or the preview changed and the figure needs
    /// a redraw.
    pub fn handle_event(&mut self, event: &MouseEvent, areas: &mut [PlotArea]) -> bool {
        if self.tool == Tool::None {
            return false;
        }
        let target = resolve_target(event, areas);
        match event.kind {
            MouseEventKind::Press => self.on_press(event, target, areas),
            MouseEventKind::Move => self.on_move(event, target, areas),
            MouseEventKind::Release => self.on_release(event, target, areas),
        }
    }

    fn on_press(&mut self, event: &MouseEvent, target: Option<AreaId>, areas: &[PlotArea]) -> bool {
        if event.button != Some(MouseButton::Left) {
            tracing::trace!(button = ?event.button, "ignoring non-left press");
            return false;
        }
        let Some(area) = target.and_then(|id| find(areas, id)) else {
            tracing::trace!("press outside every plot area");
            return false;
        };
        // A fresh press always re-anchors, even if a release was lost.
        let had_preview = self.cancel_gesture();
        self.active_area = Some(area.id());
        match self.tool {
            Tool::Pan => {
                self.pan = Some(PanAnchor {
                    pixel: event.pixel,
                    viewport: area.viewport(),
                    bounds: area.bounds(),
                });
                self.status = String::from("Panning");
                had_preview
            }
            Tool::Zoom => {
                self.zoom = Some(ZoomAnchor {
                    data: event.data,
                    pixel: event.pixel,
                });
                self.preview = Some(drag_rect(event.pixel, event.pixel));
                self.status = String::from("Selecting zoom region");
                true
            }
            Tool::None => had_preview,
        }
    }

    fn on_move(
        &mut self,
        event: &MouseEvent,
        target: Option<AreaId>,
        areas: &mut [PlotArea],
    ) -> bool {
        let Some(active) = self.active_area else {
            return false;
        };
        if target != Some(active) {
            tracing::trace!(?target, ?active, "ignoring move outside the gesture area");
            return false;
        }
        if let Some(anchor) = self.pan {
            let Some(area) = find_mut(areas, active) else {
                return false;
            };
            let delta = ScreenPoint::new(
                event.pixel.x - anchor.pixel.x,
                event.pixel.y - anchor.pixel.y,
            );
            let next = pan_viewport(anchor.viewport, anchor.bounds, delta);
            return match area.set_view(next) {
                Ok(()) => true,
                Err(err) => {
                    tracing::trace!(%err, "pan produced unusable limits");
                    false
                }
            };
        }
        if let Some(anchor) = self.zoom {
            self.preview = Some(drag_rect(anchor.pixel, event.pixel));
            if let Some(area) = find(areas, active) {
                let width = (event.data.x - anchor.data.x).abs();
                let height = (event.data.y - anchor.data.y).abs();
                self.status = format!(
                    "Zoom region: {} x {}",
                    area.x_axis().formatter().format(width),
                    area.y_axis().formatter().format(height)
                );
            }
            return true;
        }
        false
    }

    fn on_release(
        &mut self,
        event: &MouseEvent,
        target: Option<AreaId>,
        areas: &mut [PlotArea],
    ) -> bool {
        let Some(active) = self.active_area else {
            return false;
        };
        if event.button != Some(MouseButton::Left) || target != Some(active) {
            tracing::trace!(?target, ?active, "ignoring release");
            return false;
        }
        if self.pan.take().is_some() {
            self.active_area = None;
            self.status = String::from("Pan complete");
            return false;
        }
        let Some(anchor) = self.zoom.take() else {
            self.active_area = None;
            return false;
        };
        self.active_area = None;
        self.preview = None;
        let Some(area) = find_mut(areas, active) else {
            return true;
        };
        match zoom_to_rect(anchor.data, event.data, self.zoom_min_extent) {
            Some(next) => match area.set_view(next) {
                Ok(()) => {
                    tracing::debug!(area = ?active, viewport = ?area.viewport(), "zoomed");
                    self.status = String::from("Zoomed");
                }
                Err(err) => tracing::trace!(%err, "zoom produced unusable limits"),
            },
            None => {
                tracing::trace!(area = ?active, "zoom region too small");
                self.status = String::from("Zoom region too small");
            }
        }
        true
    }

    /// Drop the gesture in progress. Returns `true` if a preview was visible.
    fn cancel_gesture(&mut self) -> bool {
        self.active_area = None;
        self.pan = None;
        self.zoom = None;
        self.preview.take().is_some()
    }
}

/// Area an event belongs to: its routed area, else the topmost area under it.
pub(crate) fn resolve_target(event: &MouseEvent, areas: &[PlotArea]) -> Option<AreaId> {
    event.area.or_else(|| {
        areas
            .iter()
            .rev()
            .find(|area| area.contains(event.pixel))
            .map(PlotArea::id)
    })
}

fn find(areas: &[PlotArea], id: AreaId) -> Option<&PlotArea> {
    areas.iter().find(|area| area.id() == id)
}

fn find_mut(areas: &mut [PlotArea], id: AreaId) -> Option<&mut PlotArea> {
    areas.iter_mut().find(|area| area.id() == id)
}
