//! Error types for the geometry engine.
//!
//! All error types use `thiserror` for ergonomic error handling. Ray-cast
//! misses and degenerate inputs are recoverable conditions: callers skip the
//! offending candidate and continue.

use thiserror::Error;

/// Geometry error type
///
/// Represents failures of the low-level geometric operations: ray casts that
/// never reach a boundary and polygon inputs without enough vertices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A ray cast found no boundary intersection within its reach
    #[error("No intersection found from ({x:.3}, {y:.3}) along ({dx:.3}, {dy:.3})")]
    NoIntersection {
        /// Ray origin x coordinate.
        x: f64,
        /// Ray origin y coordinate.
        y: f64,
        /// Ray direction x component.
        dx: f64,
        /// Ray direction y component.
        dy: f64,
    },

    /// A polygon was supplied with fewer vertices than a closed ring needs
    #[error("Degenerate polygon with {count} vertices (at least 3 required)")]
    DegeneratePolygon {
        /// The number of vertices supplied.
        count: usize,
    },
}

/// Result type using GeometryError
pub type Result<T> = std::result::Result<T, GeometryError>;
