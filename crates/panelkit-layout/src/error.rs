//! Error handling for the layout engine.
//!
//! Distinguishes recoverable per-candidate conditions (a tab that cannot be
//! grown, a fillet that cannot be rounded) from failures that surface to the
//! caller (a board file that cannot be read, an export without a target).
//! All error types use `thiserror`.

use thiserror::Error;

use panelkit_geometry::GeometryError;

/// Layout error type
///
/// Represents failures of board handling, tab construction and export.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A geometric primitive failed
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Tab shoulder rounding is impossible for this tab geometry
    #[error("Fillet radius {radius} does not fit a tab {width} wide")]
    FilletUnavailable {
        /// The requested fillet radius.
        radius: f64,
        /// The width of the tab being rounded.
        width: f64,
    },

    /// A tab anchor lies strictly inside the panel body
    #[error("Tab anchor at ({x:.3}, {y:.3}) is inside the panel body")]
    AnchorInsidePanel {
        /// Anchor x coordinate.
        x: f64,
        /// Anchor y coordinate.
        y: f64,
    },

    /// A board file could not be loaded
    #[error("Failed to load board '{path}': {reason}")]
    LoadFailure {
        /// The path of the board file.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// Export was requested without a destination
    #[error("No export target set")]
    ExportTargetUnset,

    /// Writing an output file failed
    #[error("Failed to write '{path}': {reason}")]
    WriteFailure {
        /// The path being written.
        path: String,
        /// Why writing failed.
        reason: String,
    },

    /// A board id no longer refers to a board
    #[error("Unknown board id {0}")]
    UnknownBoard(u64),
}

impl LayoutError {
    /// Recoverable conditions are skipped per candidate; the build goes on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LayoutError::Geometry(_)
                | LayoutError::FilletUnavailable { .. }
                | LayoutError::AnchorInsidePanel { .. }
        )
    }
}

/// Result type using LayoutError
pub type Result<T> = std::result::Result<T, LayoutError>;
