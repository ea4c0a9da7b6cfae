//! canvasplot is an immediate-mode plotting library with a pyplot-style API.
//!
//! A [`Figure`] owns plot areas and a navigation toolbar. Each redraw produces
//! a flat [`RenderList`] of pixel-space drawing commands that a host replays
//! onto its canvas through [`RenderSurface`]. Raw pointer input fed to the
//! figure is routed to the plot area under the pointer, dispatched to
//! subscribers, and then drives pan and zoom gestures.
//!
//! ```
//! use canvasplot::{Figure, MouseButton};
//!
//! let mut figure = Figure::new();
//! let area = figure.add_subplot(1, 1, 1).unwrap();
//! figure.plot(area, &[0.0, 10.0], &[0.0, 10.0]).unwrap();
//!
//! figure.activate_pan();
//! figure.press_now(430.0, 280.0, MouseButton::Left);
//! figure.motion(500.0, 280.0);
//! figure.release(500.0, 280.0, MouseButton::Left);
//!
//! assert_eq!(figure.get_xlim(area).unwrap(), (-1.0, 9.0));
//! ```

#![forbid(unsafe_code)]

pub mod artist;
pub mod axes;
pub mod axis;
pub mod config;
pub mod error;
pub mod events;
pub mod figure;
pub mod geom;
mod interaction;
pub mod pyplot;
pub mod render;
pub mod style;
pub mod toolbar;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use artist::{ArtistId, Line2D, Picker};
pub use axes::{AreaId, PlotArea};
pub use axis::{AxisConfig, AxisFormatter, AxisScaling, LinearTicks, Tick, TickProvider};
pub use config::{FigureConfig, InteractionConfig, Margins};
pub use error::{Axis, PlotError, PlotResult};
pub use events::{
    Channel, InputRouter, MouseButton, MouseEvent, MouseEventKind, PickEvent, PlotEvent,
    SubscriptionId,
};
pub use figure::{Figure, FigureBuilder};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use pyplot::PlottingContext;
pub use render::{
    LineSegment, LineStyle, MarkerStyle, RectStyle, RenderCommand, RenderList, RenderSurface,
    TextAlign, TextStyle,
};
pub use style::{Color, Theme};
pub use toolbar::{NavigationToolbar, Tool};
pub use transform::Transform;
pub use view::{Range, Viewport};
