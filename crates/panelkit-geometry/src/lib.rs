//! # PanelKit Geometry
//!
//! This crate provides the 2-D geometric foundation for panel layout: a
//! semantic wrapper over polygon algebra plus a directional ray-cast and
//! swept-collision engine. Everything works on f64 millimetre coordinates
//! in a y-down frame.
//!
//! ## Core Components
//!
//! - **Primitives**: placement transforms, boolean set operations,
//!   distances, bounds and winding normalization
//! - **Offset**: sharp and rounded polygon buffering, morphological
//!   closing for mill-radius simulation
//! - **Raycast**: finite-segment ray casting against boundaries, boundary
//!   sampling, first-contact sweeps between shapes
//!
//! ## Architecture
//!
//! ```text
//! primitives (polygon algebra, transforms)
//!   ├── offset  (buffering, closing)
//!   └── raycast (shoot, closest_hit, collision)
//! ```
//!
//! The crates above this one never name the backing geometry libraries;
//! they use these modules and the re-exported types only.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use panelkit_geometry::{raycast, Point};
//!
//! let hits = raycast::shoot(Point::new(0.0, 0.0), &shapes, (0.0, 1.0));
//! if let Some(first) = hits.first() {
//!     // nearest boundary contact along +y
//! }
//! ```

pub mod error;
pub mod offset;
pub mod primitives;
pub mod raycast;

// Re-export the geometry types the rest of the workspace works with
pub use geo::{Coord, Line, LineString, MultiLineString, MultiPolygon, Point, Polygon, Rect};

pub use error::{GeometryError, Result};
pub use primitives::Bounds;
pub use raycast::{RayHit, RAY_REACH_FACTOR};
