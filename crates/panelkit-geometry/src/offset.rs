//! Polygon buffering.
//!
//! Wraps the straight-skeleton buffering from `geo_buf`. Sharp offsets keep
//! corner points (used for the clearance ring around each board when carving
//! the tight panel body); rounded offsets arc the corners (used for tab
//! shoulder fillets and the mill-radius simulation).

use geo::MultiPolygon;
use geo_buf::{buffer_multi_polygon, buffer_multi_polygon_rounded};

/// Offset a shape by `distance` with sharp corners. Negative distances
/// shrink.
pub fn offset(shapes: &MultiPolygon, distance: f64) -> MultiPolygon {
    if shapes.0.is_empty() || distance == 0.0 {
        return shapes.clone();
    }
    buffer_multi_polygon(shapes, distance)
}

/// Offset a shape by `distance` with rounded corners. Negative distances
/// shrink.
pub fn offset_rounded(shapes: &MultiPolygon, distance: f64) -> MultiPolygon {
    if shapes.0.is_empty() || distance == 0.0 {
        return shapes.clone();
    }
    buffer_multi_polygon_rounded(shapes, distance)
}

/// Morphological closing with `radius` round joins: grow then shrink by the
/// same amount. Concave corners and slots narrower than the cutter diameter
/// fill in, which is how a milled outline actually comes out.
pub fn close_rounded(shapes: &MultiPolygon, radius: f64) -> MultiPolygon {
    if shapes.0.is_empty() || radius <= 0.0 {
        return shapes.clone();
    }
    let grown = offset_rounded(shapes, radius);
    offset_rounded(&grown, -radius)
}
