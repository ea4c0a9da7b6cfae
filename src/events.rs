//! Pointer routing for a single plot area.
//!
//! Every [`PlotArea`](crate::axes::PlotArea) owns an [`InputRouter`]. The
//! router turns raw surface-relative pointer input into canonical
//! [`MouseEvent`]s scoped to its area, detects double clicks, runs picking on
//! presses, and dispatches to subscribers.
//!
//! Subscribers on one channel run in registration order. There is no ordering
//! guarantee across channels beyond "press, then its picks".

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use web_time::Instant;

use crate::artist::{ArtistId, Line2D, Picker};
use crate::axes::AreaId;
use crate::config::InteractionConfig;
use crate::error::PlotError;
use crate::geom::{Point, ScreenPoint};
use crate::transform::Transform;

static SUBSCRIPTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Mouse button that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// Primary button.
    #[default]
    Left,
    /// Middle button or wheel click.
    Middle,
    /// Secondary button.
    Right,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed.
    Press,
    /// Button released.
    Release,
    /// Pointer moved.
    Move,
}

/// Canonical pointer event scoped to one plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Event phase.
    pub kind: MouseEventKind,
    /// Position in surface pixels.
    pub pixel: ScreenPoint,
    /// Position in the owning area's data coordinates.
    pub data: Point,
    /// Button for press/release; `None` for moves.
    pub button: Option<MouseButton>,
    /// Set on a press that completes a double click.
    pub dblclick: bool,
    /// Plot area the event was routed through, if known.
    pub area: Option<AreaId>,
}

/// An artist was hit by a press.
#[derive(Debug, Clone, PartialEq)]
pub struct PickEvent {
    /// Picked artist.
    pub artist: ArtistId,
    /// Area owning the artist.
    pub area: AreaId,
    /// Indices of the data points within pick tolerance.
    pub indices: Vec<usize>,
    /// Press that triggered the pick.
    pub mouse: MouseEvent,
}

/// Payload delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotEvent {
    /// Press, release or move.
    Mouse(MouseEvent),
    /// Artist pick.
    Pick(PickEvent),
}

/// Subscription channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Button presses inside the area.
    Press,
    /// Button releases inside the area.
    Release,
    /// Pointer motion inside the area.
    Move,
    /// Artist picks.
    Pick,
}

impl FromStr for Channel {
    type Err = PlotError;

    /// Accepts short names (`"press"`) and the matplotlib event names
    /// (`"button_press_event"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "press" | "button_press_event" => Ok(Self::Press),
            "release" | "button_release_event" => Ok(Self::Release),
            "move" | "motion_notify_event" => Ok(Self::Move),
            "pick" | "pick_event" => Ok(Self::Pick),
            other => Err(PlotError::InvalidArgument(format!(
                "unknown event type {other:?}"
            ))),
        }
    }
}

/// Handle returned by [`InputRouter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(SUBSCRIPTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback = Box<dyn FnMut(&PlotEvent)>;

struct Subscriber {
    id: SubscriptionId,
    channel: Channel,
    callback: Callback,
}

#[derive(Debug, Clone, Copy)]
struct PressRecord {
    at: Instant,
    pixel: ScreenPoint,
}

/// Pointer capture, double-click detection, picking, and dispatch for one area.
pub struct InputRouter {
    area: AreaId,
    subscribers: Vec<Subscriber>,
    last_press: Option<PressRecord>,
    last_pointer: Option<ScreenPoint>,
    pressed: bool,
    double_click_interval: Duration,
    double_click_distance_px: f64,
    pick_tolerance_px: f64,
}

impl std::fmt::Debug for InputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRouter")
            .field("area", &self.area)
            .field("subscribers", &self.subscribers.len())
            .field("pressed", &self.pressed)
            .field("last_pointer", &self.last_pointer)
            .finish()
    }
}

impl InputRouter {
    /// Create a router for `area`.
    pub fn new(area: AreaId, config: &InteractionConfig) -> Self {
        Self {
            area,
            subscribers: Vec::new(),
            last_press: None,
            last_pointer: None,
            pressed: false,
            double_click_interval: config.double_click_interval,
            double_click_distance_px: config.double_click_distance_px,
            pick_tolerance_px: config.pick_tolerance_px,
        }
    }

    /// Register a callback on a channel.
    pub fn on(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&PlotEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers.push(Subscriber {
            id,
            channel,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns `false` if the id is not registered here.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }

    /// Number of subscribers on a channel.
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.subscribers
            .iter()
            .filter(|subscriber| subscriber.channel == channel)
            .count()
    }

    /// Last pointer position seen by this router, inside the area or not.
    pub fn last_pointer(&self) -> Option<ScreenPoint> {
        self.last_pointer
    }

    /// Whether a press inside the area has not been followed by any release.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Record the pointer position for cursor read-outs.
    pub(crate) fn track_pointer(&mut self, pixel: ScreenPoint) {
        self.last_pointer = Some(pixel);
    }

    /// Route a press. Returns the canonical event when the press hits the area.
    pub(crate) fn press(
        &mut self,
        pixel: ScreenPoint,
        button: MouseButton,
        now: Instant,
        transform: &Transform,
        artists: &[Line2D],
    ) -> Option<MouseEvent> {
        if !transform.screen().contains(pixel) {
            return None;
        }
        let dblclick = self.is_double_click(pixel, now);
        self.last_press = Some(PressRecord { at: now, pixel });
        self.pressed = true;

        let event = MouseEvent {
            kind: MouseEventKind::Press,
            pixel,
            data: transform.to_data(pixel),
            button: Some(button),
            dblclick,
            area: Some(self.area),
        };
        self.dispatch(Channel::Press, &PlotEvent::Mouse(event.clone()));

        for pick in self.pick(&event, transform, artists) {
            self.dispatch(Channel::Pick, &PlotEvent::Pick(pick));
        }
        Some(event)
    }

    /// Any release ends the press, wherever it lands.
    pub(crate) fn end_press(&mut self) {
        self.pressed = false;
    }

    /// Route a release. Returns the canonical event when it lands in the area.
    pub(crate) fn release(
        &mut self,
        pixel: ScreenPoint,
        button: MouseButton,
        transform: &Transform,
    ) -> Option<MouseEvent> {
        self.end_press();
        if !transform.screen().contains(pixel) {
            return None;
        }
        let event = MouseEvent {
            kind: MouseEventKind::Release,
            pixel,
            data: transform.to_data(pixel),
            button: Some(button),
            dblclick: false,
            area: Some(self.area),
        };
        self.dispatch(Channel::Release, &PlotEvent::Mouse(event.clone()));
        Some(event)
    }

    /// Route a move. The pointer must already be tracked.
    pub(crate) fn motion(
        &mut self,
        pixel: ScreenPoint,
        transform: &Transform,
    ) -> Option<MouseEvent> {
        if !transform.screen().contains(pixel) {
            return None;
        }
        let event = MouseEvent {
            kind: MouseEventKind::Move,
            pixel,
            data: transform.to_data(pixel),
            button: None,
            dblclick: false,
            area: Some(self.area),
        };
        self.dispatch(Channel::Move, &PlotEvent::Mouse(event.clone()));
        Some(event)
    }

    fn is_double_click(&self, pixel: ScreenPoint, now: Instant) -> bool {
        let Some(previous) = self.last_press else {
            return false;
        };
        // A clock that went backwards never yields a double click.
        let Some(elapsed) = now.checked_duration_since(previous.at) else {
            return false;
        };
        elapsed < self.double_click_interval
            && previous.pixel.distance(pixel) <= self.double_click_distance_px
    }

    fn pick(&self, event: &MouseEvent, transform: &Transform, artists: &[Line2D]) -> Vec<PickEvent> {
        artists
            .iter()
            .filter(|artist| artist.is_visible())
            .filter_map(|artist| {
                let tolerance = match artist.picker() {
                    Picker::Disabled => return None,
                    Picker::Default => self.pick_tolerance_px,
                    Picker::Radius(radius) => radius,
                };
                let indices = artist.hit_indices(event.pixel, transform, tolerance);
                (!indices.is_empty()).then(|| PickEvent {
                    artist: artist.id(),
                    area: self.area,
                    indices,
                    mouse: event.clone(),
                })
            })
            .collect()
    }

    fn dispatch(&mut self, channel: Channel, event: &PlotEvent) {
        for subscriber in self
            .subscribers
            .iter_mut()
            .filter(|subscriber| subscriber.channel == channel)
        {
            (subscriber.callback)(event);
        }
    }
}
