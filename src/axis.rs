//! Axis configuration, scaling state, and the tick-provider seam.

use std::sync::Arc;

use crate::view::Range;

/// Per-axis limit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScaling {
    /// Limits follow plotted data, growing to cover each new artist.
    #[default]
    Auto,
    /// Limits were set explicitly and no longer follow data.
    Fixed,
}

impl AxisScaling {
    /// Whether the axis still follows plotted data.
    pub fn is_auto(self) -> bool {
        self == Self::Auto
    }
}

/// A tick position with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position in data coordinates.
    pub value: f64,
    /// Label text. Minor ticks usually leave this empty.
    pub label: String,
    /// Major ticks get labels and longer marks.
    pub major: bool,
}

/// Computes tick positions and labels for a visible range.
///
/// Tick placement is a collaborator concern: plot areas only turn the returned
/// positions into pixel marks.
pub trait TickProvider: Send + Sync {
    /// Ticks for `range`, laid out over `axis_pixels` pixels.
    fn ticks(&self, range: Range, axis_pixels: f64, formatter: &AxisFormatter) -> Vec<Tick>;
}

impl std::fmt::Debug for dyn TickProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TickProvider")
    }
}

/// Default provider producing 1/2/5 × 10ⁿ steps roughly every 80 pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTicks;

const TARGET_TICK_SPACING_PX: f64 = 80.0;
const MAX_TICKS: usize = 64;

impl TickProvider for LinearTicks {
    fn ticks(&self, range: Range, axis_pixels: f64, formatter: &AxisFormatter) -> Vec<Tick> {
        if !range.is_valid() || !(axis_pixels > 0.0) {
            return Vec::new();
        }
        let target = (axis_pixels / TARGET_TICK_SPACING_PX).clamp(2.0, 10.0);
        let step = nice_step(range.span() / target);
        let decimals = (-(step.log10() + 1e-9).floor()).max(0.0) as usize;
        let first = (range.min / step).ceil() as i64;
        let mut ticks = Vec::new();
        for index in first.. {
            let value = index as f64 * step;
            if value > range.max + step * 1e-9 || ticks.len() >= MAX_TICKS {
                break;
            }
            let label = match formatter {
                AxisFormatter::Default => format_fixed(value, decimals),
                custom => custom.format(value),
            };
            ticks.push(Tick {
                value,
                label,
                major: true,
            });
        }
        ticks
    }
}

fn nice_step(raw: f64) -> f64 {
    let exponent = raw.log10().floor() as i32;
    let residual = raw / 10_f64.powi(exponent);
    let (nice, exponent) = if residual <= 1.0 {
        (1.0, exponent)
    } else if residual <= 2.0 {
        (2.0, exponent)
    } else if residual <= 5.0 {
        (5.0, exponent)
    } else {
        (1.0, exponent + 1)
    };
    // Dividing keeps steps like 0.1 and 0.05 correctly rounded.
    if exponent >= 0 {
        nice * 10_f64.powi(exponent)
    } else {
        nice / 10_f64.powi(-exponent)
    }
}

fn format_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Formatter for tick labels and coordinate read-outs.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// Default numeric formatter.
    #[default]
    Default,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Default => format!("{value:.4}"),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "AxisFormatter::Default"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}

/// Presentation settings for one axis.
#[derive(Debug, Clone, Default)]
pub struct AxisConfig {
    label: Option<String>,
    formatter: AxisFormatter,
}

impl AxisConfig {
    /// Create a default axis configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the axis formatter.
    pub fn with_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Access the axis label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Access the formatter.
    pub fn formatter(&self) -> &AxisFormatter {
        &self.formatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_ticks_use_nice_steps() {
        let ticks = LinearTicks.ticks(Range::new(0.0, 10.0), 400.0, &AxisFormatter::Default);
        let values: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks[1].label, "2");
    }

    #[test]
    fn linear_ticks_label_fractional_steps() {
        let ticks = LinearTicks.ticks(Range::new(-0.5, 0.5), 200.0, &AxisFormatter::Default);
        let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, vec!["-0.5", "0.0", "0.5"]);
    }

    #[test]
    fn linear_ticks_empty_for_degenerate_input() {
        assert!(
            LinearTicks
                .ticks(Range::new(1.0, 1.0), 400.0, &AxisFormatter::Default)
                .is_empty()
        );
        assert!(
            LinearTicks
                .ticks(Range::new(0.0, 1.0), 0.0, &AxisFormatter::Default)
                .is_empty()
        );
        assert!(
            LinearTicks
                .ticks(Range::new(-1e308, 1e308), 400.0, &AxisFormatter::Default)
                .is_empty()
        );
    }

    #[test]
    fn custom_formatter_is_used() {
        let formatter = AxisFormatter::Custom(Arc::new(|value| format!("{value}s")));
        let ticks = LinearTicks.ticks(Range::new(0.0, 1.0), 160.0, &formatter);
        assert_eq!(ticks.first().map(|tick| tick.label.as_str()), Some("0s"));
    }
}
