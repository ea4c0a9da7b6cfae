//! Error types shared across the plotting core.

use thiserror::Error;

use crate::artist::ArtistId;
use crate::axes::AreaId;

/// Axis selector used in error reports and per-axis operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Errors produced by plotting operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// A data range or pixel extent collapsed, so the transform is undefined.
    ///
    /// Committed limits are always padded, so hitting this indicates a bug in
    /// the caller's layout or limit handling rather than bad user input.
    #[error("degenerate transform on the {axis} axis")]
    DegenerateTransform {
        /// Axis whose range or pixel extent is degenerate.
        axis: Axis,
    },

    /// Malformed plotting call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The plot area handle does not belong to this figure.
    #[error("unknown plot area {0:?}")]
    UnknownArea(AreaId),

    /// The artist handle does not belong to this plot area.
    #[error("unknown artist {0:?}")]
    UnknownArtist(ArtistId),
}

/// Result alias for plotting operations.
pub type PlotResult<T> = Result<T, PlotError>;
