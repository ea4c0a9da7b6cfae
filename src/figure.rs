//! Figures: the top-level container owning plot areas, the toolbar, and the
//! current frame.
//!
//! Hosts drive a figure with raw pointer input through [`Figure::press`],
//! [`Figure::release`] and [`Figure::motion`], then paint
//! [`Figure::frame`] (or call [`Figure::render_to`]). With `auto_draw`
//! enabled, every mutation rebuilds the frame immediately.

use web_time::Instant;

use crate::artist::ArtistId;
use crate::axes::{AreaId, PlotArea};
use crate::config::{FigureConfig, InteractionConfig, Margins};
use crate::error::{PlotError, PlotResult};
use crate::events::{Channel, MouseButton, MouseEvent, PlotEvent, SubscriptionId};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{RectStyle, RenderCommand, RenderList, RenderSurface};
use crate::style::{Color, Theme};
use crate::toolbar::NavigationToolbar;

/// Top-level plotting container.
#[derive(Debug)]
pub struct Figure {
    config: FigureConfig,
    areas: Vec<PlotArea>,
    next_area_id: u64,
    toolbar: Option<NavigationToolbar>,
    frame: RenderList,
    draw_count: u64,
}

impl Figure {
    /// Create an 8×6 inch figure at 100 dpi with a toolbar.
    pub fn new() -> Self {
        Self::with_config(FigureConfig::default())
    }

    /// Create a figure from an explicit configuration.
    pub fn with_config(config: FigureConfig) -> Self {
        let toolbar = config
            .toolbar
            .then(|| NavigationToolbar::new(&config.interaction));
        let mut figure = Self {
            config,
            areas: Vec::new(),
            next_area_id: 1,
            toolbar,
            frame: RenderList::new(),
            draw_count: 0,
        };
        figure.after_mutation();
        figure
    }

    /// Start building a figure with custom configuration.
    pub fn builder() -> FigureBuilder {
        FigureBuilder::default()
    }

    /// Access the configuration.
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Figure size in pixels.
    pub fn size(&self) -> (f64, f64) {
        self.config.pixel_size()
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Change the figure background.
    pub fn set_facecolor(&mut self, color: Color) {
        self.config.theme.background = color;
        self.after_mutation();
    }

    /// Enable or disable redraw after every mutation.
    pub fn set_auto_draw(&mut self, enabled: bool) {
        self.config.auto_draw = enabled;
    }

    /// Add a subplot. Only the single-cell `(1, 1, 1)` geometry is supported.
    pub fn add_subplot(&mut self, nrows: usize, ncols: usize, index: usize) -> PlotResult<AreaId> {
        if (nrows, ncols, index) != (1, 1, 1) {
            return Err(PlotError::InvalidArgument(format!(
                "unsupported subplot geometry ({nrows}, {ncols}, {index}); only (1, 1, 1) is available"
            )));
        }
        let bounds = subplot_rect(self.size(), &self.config.margins)?;
        let id = self.push_area(bounds, true);
        Ok(id)
    }

    /// Add a plot area at an explicit pixel rectangle.
    pub fn add_axes(&mut self, rect: ScreenRect) -> PlotResult<AreaId> {
        let rect = rect.normalized();
        if !rect.is_valid() {
            return Err(PlotError::InvalidArgument(format!(
                "plot area needs a positive, finite size, got {rect:?}"
            )));
        }
        Ok(self.push_area(rect, false))
    }

    fn push_area(&mut self, bounds: ScreenRect, subplot: bool) -> AreaId {
        let id = AreaId::from_raw(self.next_area_id);
        self.next_area_id += 1;
        let mut area = PlotArea::new(id, bounds, &self.config.interaction);
        area.subplot = subplot;
        if let Some(toolbar) = self.toolbar.as_mut() {
            toolbar.register(&area);
        }
        self.areas.push(area);
        self.after_mutation();
        id
    }

    /// Plot areas in draw order.
    pub fn areas(&self) -> &[PlotArea] {
        &self.areas
    }

    /// Look up a plot area.
    pub fn area(&self, id: AreaId) -> PlotResult<&PlotArea> {
        self.areas
            .iter()
            .find(|area| area.id() == id)
            .ok_or(PlotError::UnknownArea(id))
    }

    /// Mutate a plot area, then redraw.
    pub fn update_area<R>(
        &mut self,
        id: AreaId,
        update: impl FnOnce(&mut PlotArea) -> R,
    ) -> PlotResult<R> {
        let area = self
            .areas
            .iter_mut()
            .find(|area| area.id() == id)
            .ok_or(PlotError::UnknownArea(id))?;
        let result = update(area);
        self.after_mutation();
        Ok(result)
    }

    /// Plot `ys` against `xs` in an area.
    pub fn plot(&mut self, area: AreaId, xs: &[f64], ys: &[f64]) -> PlotResult<ArtistId> {
        self.update_area(area, |area| area.plot(xs, ys))?
    }

    /// Scatter markers at `(xs, ys)` in an area.
    pub fn scatter(&mut self, area: AreaId, xs: &[f64], ys: &[f64]) -> PlotResult<ArtistId> {
        self.update_area(area, |area| area.scatter(xs, ys))?
    }

    /// Plot `ys` against sample indices in an area.
    pub fn plot_y(&mut self, area: AreaId, ys: &[f64]) -> PlotResult<ArtistId> {
        self.update_area(area, |area| area.plot_y(ys))
    }

    /// Set an area's x limits. See [`PlotArea::set_xlim`].
    pub fn set_xlim(&mut self, area: AreaId, lo: Option<f64>, hi: Option<f64>) -> PlotResult<()> {
        self.update_area(area, |area| area.set_xlim(lo, hi))?
    }

    /// Set an area's y limits. See [`PlotArea::set_ylim`].
    pub fn set_ylim(&mut self, area: AreaId, lo: Option<f64>, hi: Option<f64>) -> PlotResult<()> {
        self.update_area(area, |area| area.set_ylim(lo, hi))?
    }

    /// An area's x limits.
    pub fn get_xlim(&self, area: AreaId) -> PlotResult<(f64, f64)> {
        Ok(self.area(area)?.get_xlim())
    }

    /// An area's y limits.
    pub fn get_ylim(&self, area: AreaId) -> PlotResult<(f64, f64)> {
        Ok(self.area(area)?.get_ylim())
    }

    /// Subscribe to an area's events.
    pub fn on(
        &mut self,
        area: AreaId,
        channel: Channel,
        callback: impl FnMut(&PlotEvent) + 'static,
    ) -> PlotResult<SubscriptionId> {
        let area = self
            .areas
            .iter_mut()
            .find(|candidate| candidate.id() == area)
            .ok_or(PlotError::UnknownArea(area))?;
        Ok(area.on(channel, callback))
    }

    /// Subscribe using a matplotlib event name such as `"button_press_event"`.
    pub fn mpl_connect(
        &mut self,
        area: AreaId,
        event: &str,
        callback: impl FnMut(&PlotEvent) + 'static,
    ) -> PlotResult<SubscriptionId> {
        let channel: Channel = event.parse()?;
        self.on(area, channel, callback)
    }

    /// Remove a subscription from whichever area holds it.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.areas.iter_mut().any(|area| area.off(id))
    }

    /// Remove every plot area. Handles issued so far stay invalid.
    pub fn clf(&mut self) {
        self.areas.clear();
        if let Some(toolbar) = self.toolbar.as_mut() {
            toolbar.forget_all();
        }
        self.after_mutation();
    }

    /// Resize the figure and re-lay out subplot areas.
    pub fn set_size_inches(&mut self, width: f64, height: f64) -> PlotResult<()> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(PlotError::InvalidArgument(format!(
                "figure size must be positive, got {width} x {height}"
            )));
        }
        let resized = FigureConfig {
            figsize: (width, height),
            ..self.config.clone()
        };
        if self.areas.iter().any(|area| area.subplot) {
            let bounds = subplot_rect(resized.pixel_size(), &resized.margins)?;
            for area in self.areas.iter_mut().filter(|area| area.subplot) {
                area.set_bounds(bounds);
            }
        }
        self.config = resized;
        self.after_mutation();
        Ok(())
    }

    /// Access the toolbar, if the figure has one.
    pub fn toolbar(&self) -> Option<&NavigationToolbar> {
        self.toolbar.as_ref()
    }

    /// Toggle the pan tool.
    pub fn activate_pan(&mut self) {
        if let Some(toolbar) = self.toolbar.as_mut()
            && toolbar.activate_pan()
        {
            self.after_mutation();
        }
    }

    /// Toggle the zoom tool.
    pub fn activate_zoom(&mut self) {
        if let Some(toolbar) = self.toolbar.as_mut()
            && toolbar.activate_zoom()
        {
            self.after_mutation();
        }
    }

    /// Restore every area to its home limits.
    pub fn reset_home(&mut self) {
        if let Some(toolbar) = self.toolbar.as_mut() {
            toolbar.reset_home(&mut self.areas);
            self.after_mutation();
        }
    }

    /// Record the current limits as home for every area.
    pub fn update_home(&mut self) {
        if let Some(toolbar) = self.toolbar.as_mut() {
            toolbar.update_home(&self.areas);
        }
    }

    /// Cursor read-out for the topmost area under the last pointer position.
    pub fn cursor_readout(&self) -> Option<String> {
        self.areas.iter().rev().find_map(|area| {
            area.cursor_position()
                .map(|point| area.format_coord(point))
        })
    }

    /// Feed a button press at surface pixel `(x, y)`.
    ///
    /// Returns the event routed to the topmost area under the pointer.
    pub fn press(&mut self, x: f64, y: f64, button: MouseButton, now: Instant) -> Option<MouseEvent> {
        let pixel = ScreenPoint::new(x, y);
        let event = self
            .areas
            .iter_mut()
            .filter_map(|area| area.route_press(pixel, button, now))
            .last();
        self.forward_to_toolbar(event.as_ref());
        event
    }

    /// [`press`](Self::press) stamped with the current time.
    pub fn press_now(&mut self, x: f64, y: f64, button: MouseButton) -> Option<MouseEvent> {
        self.press(x, y, button, Instant::now())
    }

    /// Feed a button release at surface pixel `(x, y)`.
    pub fn release(&mut self, x: f64, y: f64, button: MouseButton) -> Option<MouseEvent> {
        let pixel = ScreenPoint::new(x, y);
        let event = self
            .areas
            .iter_mut()
            .filter_map(|area| area.route_release(pixel, button))
            .last();
        self.forward_to_toolbar(event.as_ref());
        event
    }

    /// Feed pointer motion to surface pixel `(x, y)`.
    pub fn motion(&mut self, x: f64, y: f64) -> Option<MouseEvent> {
        let pixel = ScreenPoint::new(x, y);
        let event = self
            .areas
            .iter_mut()
            .filter_map(|area| area.route_motion(pixel))
            .last();
        self.forward_to_toolbar(event.as_ref());
        event
    }

    fn forward_to_toolbar(&mut self, event: Option<&MouseEvent>) {
        let Some(event) = event else {
            return;
        };
        let Some(toolbar) = self.toolbar.as_mut() else {
            return;
        };
        if toolbar.handle_event(event, &mut self.areas) {
            self.after_mutation();
        }
    }

    fn after_mutation(&mut self) {
        if self.config.auto_draw {
            self.draw();
        }
    }

    /// Rebuild the frame from the current state.
    pub fn draw(&mut self) -> &RenderList {
        let (width, height) = self.size();
        self.frame.clear();
        self.frame.push(RenderCommand::Rect {
            rect: ScreenRect::from_origin_size(0.0, 0.0, width, height),
            style: RectStyle::filled(self.config.theme.background),
        });
        for area in &self.areas {
            area.draw(&mut self.frame, &self.config.theme);
        }
        if let Some(toolbar) = self.toolbar.as_ref() {
            toolbar.draw_overlay(&mut self.frame, &self.config.theme);
        }
        self.draw_count += 1;
        tracing::trace!(
            commands = self.frame.len(),
            draws = self.draw_count,
            "frame rebuilt"
        );
        &self.frame
    }

    /// The most recently drawn frame.
    pub fn frame(&self) -> &RenderList {
        &self.frame
    }

    /// Number of frames drawn so far.
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// Replay the current frame onto a host surface.
    pub fn render_to(&self, surface: &mut dyn RenderSurface) {
        self.frame.replay(surface);
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}

fn subplot_rect(size: (f64, f64), margins: &Margins) -> PlotResult<ScreenRect> {
    let rect = ScreenRect::from_origin_size(
        margins.left,
        margins.top,
        size.0 - margins.left - margins.right,
        size.1 - margins.top - margins.bottom,
    );
    if !rect.is_valid() {
        return Err(PlotError::InvalidArgument(format!(
            "a {} x {} px figure leaves no room inside its margins",
            size.0, size.1
        )));
    }
    Ok(rect)
}

/// Builder for configuring a figure before construction.
#[derive(Debug, Default)]
pub struct FigureBuilder {
    config: FigureConfig,
}

impl FigureBuilder {
    /// Set the size in inches.
    pub fn figsize(mut self, width: f64, height: f64) -> Self {
        self.config.figsize = (width, height);
        self
    }

    /// Set pixels per inch.
    pub fn dpi(mut self, dpi: f64) -> Self {
        self.config.dpi = dpi;
        self
    }

    /// Set the figure background.
    pub fn facecolor(mut self, color: Color) -> Self {
        self.config.theme.background = color;
        self
    }

    /// Attach or omit the navigation toolbar.
    pub fn toolbar(mut self, enabled: bool) -> Self {
        self.config.toolbar = enabled;
        self
    }

    /// Redraw after every mutation.
    pub fn auto_draw(mut self, enabled: bool) -> Self {
        self.config.auto_draw = enabled;
        self
    }

    /// Set the subplot margins.
    pub fn margins(mut self, margins: Margins) -> Self {
        self.config.margins = margins;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    /// Set interaction thresholds.
    pub fn interaction(mut self, interaction: InteractionConfig) -> Self {
        self.config.interaction = interaction;
        self
    }

    /// Build the figure.
    pub fn build(self) -> Figure {
        Figure::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subplot_uses_margins() {
        let mut figure = Figure::new();
        let id = figure.add_subplot(1, 1, 1).unwrap();
        let bounds = figure.area(id).unwrap().bounds();
        assert_eq!(bounds, ScreenRect::from_origin_size(80.0, 20.0, 700.0, 520.0));
    }

    #[test]
    fn grids_are_rejected() {
        let mut figure = Figure::new();
        assert!(matches!(
            figure.add_subplot(2, 1, 1),
            Err(PlotError::InvalidArgument(_))
        ));
        assert!(figure.areas().is_empty());
    }

    #[test]
    fn area_ids_are_not_reused_after_clf() {
        let mut figure = Figure::new();
        let first = figure.add_subplot(1, 1, 1).unwrap();
        figure.clf();
        assert!(matches!(figure.area(first), Err(PlotError::UnknownArea(_))));
        let second = figure.add_subplot(1, 1, 1).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn mutations_redraw_when_auto_draw_is_on() {
        let mut figure = Figure::new();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        let before = figure.draw_count();
        figure.plot(area, &[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert_eq!(figure.draw_count(), before + 1);

        figure.set_auto_draw(false);
        figure.set_xlim(area, Some(0.0), Some(2.0)).unwrap();
        assert_eq!(figure.draw_count(), before + 1);
    }

    #[test]
    fn resize_moves_subplots_only() {
        let mut figure = Figure::new();
        let subplot = figure.add_subplot(1, 1, 1).unwrap();
        let explicit = figure
            .add_axes(ScreenRect::from_origin_size(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        figure.set_size_inches(4.0, 3.0).unwrap();
        assert_eq!(figure.size(), (400.0, 300.0));
        assert_eq!(
            figure.area(subplot).unwrap().bounds(),
            ScreenRect::from_origin_size(80.0, 20.0, 300.0, 220.0)
        );
        assert_eq!(
            figure.area(explicit).unwrap().bounds(),
            ScreenRect::from_origin_size(0.0, 0.0, 50.0, 50.0)
        );
        assert!(figure.set_size_inches(0.0, 3.0).is_err());
    }

    #[test]
    fn subplot_must_fit_inside_margins() {
        let mut figure = Figure::builder().figsize(1.0, 0.8).build();
        assert!(matches!(
            figure.add_subplot(1, 1, 1),
            Err(PlotError::InvalidArgument(_))
        ));
        assert!(figure.areas().is_empty());
    }

    #[test]
    fn shrinking_below_margins_is_rejected_without_side_effects() {
        let mut figure = Figure::new();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        assert!(matches!(
            figure.set_size_inches(0.9, 0.7),
            Err(PlotError::InvalidArgument(_))
        ));
        assert_eq!(figure.size(), (800.0, 600.0));
        assert!(figure.area(area).unwrap().transform().is_ok());
    }

    #[test]
    fn frame_starts_with_figure_background() {
        let mut figure = Figure::builder().facecolor(Color::BLACK).build();
        figure.add_subplot(1, 1, 1).unwrap();
        match &figure.frame().commands()[0] {
            RenderCommand::Rect { rect, style } => {
                assert_eq!(rect.width(), 800.0);
                assert_eq!(style.fill, Color::BLACK);
            }
            other => panic!("unexpected first command {other:?}"),
        }
    }

    #[test]
    fn zoom_preview_is_overlaid_last() {
        let mut figure = Figure::new();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        figure.plot(area, &[0.0, 10.0], &[0.0, 10.0]).unwrap();
        figure.activate_zoom();
        figure.press_now(200.0, 200.0, MouseButton::Left);
        figure.motion(300.0, 300.0);
        match figure.frame().commands().last() {
            Some(RenderCommand::Rect { rect, .. }) => {
                assert_eq!(rect.min, ScreenPoint::new(200.0, 200.0));
                assert_eq!(rect.max, ScreenPoint::new(300.0, 300.0));
            }
            other => panic!("expected preview rect, got {other:?}"),
        }
    }

    #[test]
    fn unknown_event_names_are_rejected() {
        let mut figure = Figure::new();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        assert!(figure.mpl_connect(area, "key_press_event", |_| {}).is_err());
        let id = figure.mpl_connect(area, "pick_event", |_| {}).unwrap();
        assert!(figure.off(id));
        assert!(!figure.off(id));
    }

    #[test]
    fn cursor_readout_formats_data_coordinates() {
        let mut figure = Figure::new();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        figure.set_xlim(area, Some(0.0), Some(700.0)).unwrap();
        figure.set_ylim(area, Some(0.0), Some(520.0)).unwrap();
        figure.motion(80.0, 540.0);
        assert_eq!(
            figure.cursor_readout().as_deref(),
            Some("x=0.0000 y=0.0000")
        );
        figure.motion(5.0, 5.0);
        assert!(figure.cursor_readout().is_none());
    }
}
