//! Frame holes.
//!
//! A hole is a user polygon in panel coordinates that is milled out of the
//! panel body. Holes carve the tight hull, exclude auto-tab candidates that
//! fall inside them, and take part in conflict detection like any other
//! occupied region.

use panelkit_geometry::primitives::polygon_from_points;
use panelkit_geometry::{MultiPolygon, Point, Polygon};

use crate::error::Result;

/// A cutout region of the panel frame.
#[derive(Debug, Clone)]
pub struct Hole {
    polygon: Polygon,
    /// Panel-frame offset applied on top of the stored polygon.
    pub x: f64,
    pub y: f64,
}

impl Hole {
    /// Close a drawn polyline into a hole polygon. Fewer than 3 distinct
    /// vertices is a recoverable geometry error.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let polygon = polygon_from_points(points)?;
        Ok(Self {
            polygon,
            x: 0.0,
            y: 0.0,
        })
    }

    /// The hole polygon at its panel position.
    pub fn global_shape(&self) -> Polygon {
        panelkit_geometry::primitives::place(&self.polygon, 0.0, self.x, self.y)
    }

    /// The stored vertex list, without the closing vertex.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let coords = &self.polygon.exterior().0;
        coords
            .iter()
            .take(coords.len().saturating_sub(1))
            .map(|c| (c.x, c.y))
            .collect()
    }

    /// True when the point lies inside the hole.
    pub fn contains(&self, p: Point) -> bool {
        let shape = MultiPolygon::new(vec![self.global_shape()]);
        panelkit_geometry::primitives::contains_point(&shape, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use panelkit_geometry::GeometryError;

    #[test]
    fn two_vertices_cannot_close() {
        let err = Hole::from_points(&[(0.0, 0.0), (5.0, 5.0)]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Geometry(GeometryError::DegeneratePolygon { count: 2 })
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn offset_moves_the_global_shape() {
        let mut hole = Hole::from_points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
        hole.x = 10.0;
        hole.y = 20.0;
        assert!(hole.contains(Point::new(12.0, 22.0)));
        assert!(!hole.contains(Point::new(2.0, 2.0)));
    }

    #[test]
    fn points_round_trip_without_the_seam() {
        let pts = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)];
        let hole = Hole::from_points(&pts).unwrap();
        assert_eq!(hole.points(), pts.to_vec());
    }
}
