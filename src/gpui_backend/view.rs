use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gpui::prelude::*;
use gpui::{
    MouseButton as GpuiMouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point,
    Window, canvas, div,
};
use web_time::Instant;

use crate::events::MouseButton;
use crate::figure::Figure;
use crate::geom::ScreenPoint;

use super::paint::{paint_frame, to_hsla};

/// A GPUI view that paints a [`Figure`] and forwards pointer input to it.
///
/// Pointer positions are translated into figure pixels relative to the
/// canvas origin of the last paint.
#[derive(Clone)]
pub struct GpuiFigureView {
    figure: Rc<RefCell<Figure>>,
    origin: Rc<Cell<ScreenPoint>>,
}

impl GpuiFigureView {
    /// Create a view for a figure.
    pub fn new(figure: Figure) -> Self {
        Self {
            figure: Rc::new(RefCell::new(figure)),
            origin: Rc::new(Cell::new(ScreenPoint::default())),
        }
    }

    /// Get a handle for mutating the underlying figure.
    pub fn figure_handle(&self) -> FigureHandle {
        FigureHandle {
            figure: Rc::clone(&self.figure),
        }
    }

    fn local(&self, position: Point<Pixels>) -> ScreenPoint {
        let origin = self.origin.get();
        ScreenPoint::new(
            f64::from(f32::from(position.x)) - origin.x,
            f64::from(f32::from(position.y)) - origin.y,
        )
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let Some(button) = map_button(ev.button) else {
            return;
        };
        let pos = self.local(ev.position);
        self.figure
            .borrow_mut()
            .press(pos.x, pos.y, button, Instant::now());
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = self.local(ev.position);
        self.figure.borrow_mut().motion(pos.x, pos.y);
        cx.notify();
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let Some(button) = map_button(ev.button) else {
            return;
        };
        let pos = self.local(ev.position);
        self.figure.borrow_mut().release(pos.x, pos.y, button);
        cx.notify();
    }
}

impl Render for GpuiFigureView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let figure = Rc::clone(&self.figure);
        let origin = Rc::clone(&self.origin);
        let background = figure.borrow().theme().background;
        let (width, height) = figure.borrow().size();
        div()
            .w(gpui::px(width as f32))
            .h(gpui::px(height as f32))
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, _, _| {
                        origin.set(ScreenPoint::new(
                            f64::from(f32::from(bounds.origin.x)),
                            f64::from(f32::from(bounds.origin.y)),
                        ));
                        let mut figure = figure.borrow_mut();
                        if !figure.config().auto_draw {
                            figure.draw();
                        }
                        (figure.frame().clone(), origin.get())
                    },
                    move |_, (frame, origin), window, cx| {
                        paint_frame(&frame, origin, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                GpuiMouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_down(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_down(
                GpuiMouseButton::Middle,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                GpuiMouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up(
                GpuiMouseButton::Middle,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
    }
}

/// A handle for mutating a [`Figure`] held inside a [`GpuiFigureView`].
///
/// The handle clones cheaply. Call `cx.notify()` on the view afterwards to
/// repaint.
#[derive(Clone)]
pub struct FigureHandle {
    figure: Rc<RefCell<Figure>>,
}

impl FigureHandle {
    /// Read the figure.
    pub fn read<R>(&self, f: impl FnOnce(&Figure) -> R) -> R {
        f(&self.figure.borrow())
    }

    /// Mutate the figure.
    pub fn write<R>(&self, f: impl FnOnce(&mut Figure) -> R) -> R {
        f(&mut self.figure.borrow_mut())
    }
}

fn map_button(button: GpuiMouseButton) -> Option<MouseButton> {
    match button {
        GpuiMouseButton::Left => Some(MouseButton::Left),
        GpuiMouseButton::Middle => Some(MouseButton::Middle),
        GpuiMouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}
