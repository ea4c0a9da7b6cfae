//! State-machine convenience API with a "current figure" and "current axes".
//!
//! [`PlottingContext`] owns the figures and tracks which one is current. The
//! free functions in this module operate on a per-thread default context.
//! Tests and embedders that want isolation can create their own context.
//!
//! ```
//! use canvasplot::pyplot;
//!
//! pyplot::reset();
//! pyplot::plot(&[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0]).unwrap();
//! assert_eq!(pyplot::xlim(None, None).unwrap(), (0.0, 2.0));
//! ```

use std::cell::RefCell;

use crate::artist::ArtistId;
use crate::axes::AreaId;
use crate::config::FigureConfig;
use crate::error::PlotResult;
use crate::figure::Figure;

/// Figures plus the current figure/area selection.
#[derive(Debug, Default)]
pub struct PlottingContext {
    figures: Vec<Figure>,
    current_figure: Option<usize>,
    current_area: Option<AreaId>,
}

impl PlottingContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every figure and clear the current selection.
    pub fn reset(&mut self) {
        self.figures.clear();
        self.current_figure = None;
        self.current_area = None;
    }

    /// Create a figure and make it current.
    pub fn figure(&mut self, config: FigureConfig) -> &mut Figure {
        self.figures.push(Figure::with_config(config));
        let index = self.figures.len() - 1;
        self.current_figure = Some(index);
        self.current_area = None;
        &mut self.figures[index]
    }

    /// Create a figure with a single subplot and make both current.
    pub fn subplots(&mut self, config: FigureConfig) -> PlotResult<AreaId> {
        let area = self.figure(config).add_subplot(1, 1, 1)?;
        self.current_area = Some(area);
        Ok(area)
    }

    /// Current figure, created with defaults if there is none.
    pub fn gcf(&mut self) -> &mut Figure {
        let index = match self.current_figure {
            Some(index) => index,
            None => {
                self.figures.push(Figure::new());
                let index = self.figures.len() - 1;
                self.current_figure = Some(index);
                self.current_area = None;
                index
            }
        };
        &mut self.figures[index]
    }

    /// Current plot area, added to the current figure if there is none.
    pub fn gca(&mut self) -> PlotResult<AreaId> {
        if let Some(area) = self.current_area
            && self.gcf().area(area).is_ok()
        {
            return Ok(area);
        }
        let area = self.gcf().add_subplot(1, 1, 1)?;
        self.current_area = Some(area);
        Ok(area)
    }

    /// Number of figures created since the last reset.
    pub fn figure_count(&self) -> usize {
        self.figures.len()
    }

    /// Plot `ys` against `xs` on the current area.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> PlotResult<ArtistId> {
        let area = self.gca()?;
        self.gcf().plot(area, xs, ys)
    }

    /// Plot `ys` against sample indices on the current area.
    pub fn plot_y(&mut self, ys: &[f64]) -> PlotResult<ArtistId> {
        let area = self.gca()?;
        self.gcf().plot_y(area, ys)
    }

    /// Set the provided x bounds of the current area and return the limits.
    ///
    /// With both bounds `None` this only reads the limits and leaves
    /// autoscaling untouched.
    pub fn xlim(&mut self, lo: Option<f64>, hi: Option<f64>) -> PlotResult<(f64, f64)> {
        let area = self.gca()?;
        let figure = self.gcf();
        if lo.is_some() || hi.is_some() {
            figure.set_xlim(area, lo, hi)?;
        }
        figure.get_xlim(area)
    }

    /// Set the provided y bounds of the current area and return the limits.
    pub fn ylim(&mut self, lo: Option<f64>, hi: Option<f64>) -> PlotResult<(f64, f64)> {
        let area = self.gca()?;
        let figure = self.gcf();
        if lo.is_some() || hi.is_some() {
            figure.set_ylim(area, lo, hi)?;
        }
        figure.get_ylim(area)
    }

    /// Clear the current figure.
    pub fn clf(&mut self) {
        self.gcf().clf();
        self.current_area = None;
    }
}

thread_local! {
    static CONTEXT: RefCell<PlottingContext> = RefCell::new(PlottingContext::new());
}

/// Run `f` against this thread's default context.
///
/// # Panics
///
/// Panics if called re-entrantly, for example from a subscriber callback
/// invoked while the context is already borrowed.
pub fn with_context<R>(f: impl FnOnce(&mut PlottingContext) -> R) -> R {
    CONTEXT.with(|context| f(&mut context.borrow_mut()))
}

/// Create a figure in the default context and make it current.
pub fn figure(config: FigureConfig) {
    with_context(|context| {
        context.figure(config);
    });
}

/// Create a figure with one subplot in the default context.
pub fn subplots(config: FigureConfig) -> PlotResult<AreaId> {
    with_context(|context| context.subplots(config))
}

/// Run `f` against the current figure of the default context.
pub fn with_gcf<R>(f: impl FnOnce(&mut Figure) -> R) -> R {
    with_context(|context| f(context.gcf()))
}

/// Current plot area of the default context.
pub fn gca() -> PlotResult<AreaId> {
    with_context(PlottingContext::gca)
}

/// Plot on the current area of the default context.
pub fn plot(xs: &[f64], ys: &[f64]) -> PlotResult<ArtistId> {
    with_context(|context| context.plot(xs, ys))
}

/// Plot against sample indices on the current area of the default context.
pub fn plot_y(ys: &[f64]) -> PlotResult<ArtistId> {
    with_context(|context| context.plot_y(ys))
}

/// See [`PlottingContext::xlim`].
pub fn xlim(lo: Option<f64>, hi: Option<f64>) -> PlotResult<(f64, f64)> {
    with_context(|context| context.xlim(lo, hi))
}

/// See [`PlottingContext::ylim`].
pub fn ylim(lo: Option<f64>, hi: Option<f64>) -> PlotResult<(f64, f64)> {
    with_context(|context| context.ylim(lo, hi))
}

/// Clear the current figure of the default context.
pub fn clf() {
    with_context(PlottingContext::clf);
}

/// Drop all figures of the default context.
pub fn reset() {
    with_context(PlottingContext::reset);
}
