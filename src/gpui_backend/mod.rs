//! GPUI integration for canvasplot.
//!
//! This module provides a GPUI view that paints a [`Figure`](crate::figure::Figure)
//! and feeds it mouse input, so the figure's toolbar and subscribers work
//! inside a GPUI window.

mod paint;
mod view;

pub use view::{FigureHandle, GpuiFigureView};
