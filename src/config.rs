//! Configuration for figures and pointer interaction.

use std::time::Duration;

use crate::style::Theme;

/// Thresholds used by event routing and the navigation toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Maximum time between two presses for the second to count as a double click.
    pub double_click_interval: Duration,
    /// Maximum pixel distance between two presses of a double click.
    pub double_click_distance_px: f64,
    /// Default pick radius for artists that enable picking.
    pub pick_tolerance_px: f64,
    /// Zoom rectangles narrower than this (in data units) are ignored on that axis.
    pub zoom_min_extent: f64,
    /// Relative padding applied to collapsed ranges before they are committed.
    pub nonsingular_expander: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            double_click_interval: Duration::from_millis(300),
            double_click_distance_px: 5.0,
            pick_tolerance_px: 5.0,
            zoom_min_extent: 0.01,
            nonsingular_expander: 0.05,
        }
    }
}

/// Pixel margins between the figure edge and a single subplot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Left margin, room for y tick labels.
    pub left: f64,
    /// Right margin.
    pub right: f64,
    /// Top margin.
    pub top: f64,
    /// Bottom margin, room for x tick labels.
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 80.0,
            right: 20.0,
            top: 20.0,
            bottom: 60.0,
        }
    }
}

/// Figure construction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
    /// Figure size in inches.
    pub figsize: (f64, f64),
    /// Pixels per inch.
    pub dpi: f64,
    /// Attach a navigation toolbar.
    pub toolbar: bool,
    /// Redraw automatically after every mutation.
    pub auto_draw: bool,
    /// Subplot margins.
    pub margins: Margins,
    /// Colors.
    pub theme: Theme,
    /// Interaction thresholds.
    pub interaction: InteractionConfig,
}

impl FigureConfig {
    /// Figure size in whole pixels.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            (self.figsize.0 * self.dpi).trunc(),
            (self.figsize.1 * self.dpi).trunc(),
        )
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            figsize: (8.0, 6.0),
            dpi: 100.0,
            toolbar: true,
            auto_draw: true,
            margins: Margins::default(),
            theme: Theme::default(),
            interaction: InteractionConfig::default(),
        }
    }
}
