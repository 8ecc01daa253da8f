//! Polygon algebra and placement transforms.
//!
//! This module is the only place the workspace touches the `geo` backend
//! directly. Everything else works with the re-exported types and the named
//! operations below, which fix the conventions the engine relies on:
//!
//! - Coordinates are f64 millimetres in a y-down frame.
//! - A positive placement rotation turns a shape clockwise on screen, which
//!   is a negative-angle rotation in geo's CCW-positive convention.
//! - Boolean operations treat empty inputs as empty sets, not errors.

use geo::algorithm::orient::{Direction, Orient};
use geo::{
    Area, BooleanOps, BoundingRect, Contains, EuclideanDistance, Intersects, LineString,
    MultiLineString, MultiPolygon, Point, Polygon, Rect, Rotate, Translate,
};

use crate::error::{GeometryError, Result};

/// Axis-aligned bounds as raw edge coordinates.
///
/// Unlike [`Rect`], the edges are stored as given: `x1/y1` may exceed
/// `x2/y2` for placements rotated out of the first quadrant. Call
/// [`Bounds::normalized`] before treating the fields as min/max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Min/max ordered copy of these bounds.
    pub fn normalized(&self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Smallest normalized bounds covering both inputs.
    pub fn union(&self, other: &Bounds) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        Self {
            x1: a.x1.min(b.x1),
            y1: a.y1.min(b.y1),
            x2: a.x2.max(b.x2),
            y2: a.y2.max(b.y2),
        }
    }

    /// Closed rectangle polygon over the normalized bounds.
    pub fn to_polygon(&self) -> Polygon {
        let n = self.normalized();
        rect_polygon(n.x1, n.y1, n.x2, n.y2)
    }

    /// Inclusive interval overlap on the x axis.
    pub fn x_overlaps(&self, other: &Bounds) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.x1 <= b.x2 && b.x1 <= a.x2
    }

    /// Inclusive interval overlap on the y axis.
    pub fn y_overlaps(&self, other: &Bounds) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.y1 <= b.y2 && b.y1 <= a.y2
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(r: Rect<f64>) -> Self {
        Self::new(r.min().x, r.min().y, r.max().x, r.max().y)
    }
}

/// Axis-aligned rectangle polygon from min/max corners.
pub fn rect_polygon(x1: f64, y1: f64, x2: f64, y2: f64) -> Polygon {
    Rect::new((x1, y1), (x2, y2)).to_polygon()
}

/// Closed polygon from an exterior vertex list.
///
/// The ring is closed automatically; a duplicated terminal vertex is
/// accepted. Fewer than 3 distinct vertices is an error.
pub fn polygon_from_points(points: &[(f64, f64)]) -> Result<Polygon> {
    let mut ring: Vec<(f64, f64)> = points.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(GeometryError::DegeneratePolygon { count: ring.len() });
    }
    Ok(Polygon::new(ring.into(), vec![]))
}

/// Place a local shape into the panel frame: rotate `rotation_degrees`
/// clockwise about the local origin, then translate by `(x, y)`.
pub fn place(shape: &Polygon, rotation_degrees: f64, x: f64, y: f64) -> Polygon {
    shape
        .rotate_around_point(-rotation_degrees, Point::new(0.0, 0.0))
        .translate(x, y)
}

/// Rotate a local point clockwise about the local origin and translate,
/// matching [`place`].
pub fn place_point(p: Point, rotation_degrees: f64, x: f64, y: f64) -> Point {
    let rotated = p.rotate_around_point(-rotation_degrees, Point::new(0.0, 0.0));
    Point::new(rotated.x() + x, rotated.y() + y)
}

/// Rotate a direction vector by the clockwise placement angle.
pub fn place_direction(d: (f64, f64), rotation_degrees: f64) -> (f64, f64) {
    let rotated = Point::new(d.0, d.1).rotate_around_point(-rotation_degrees, Point::new(0.0, 0.0));
    (rotated.x(), rotated.y())
}

/// Union of a polygon list into one multi-polygon.
pub fn union_all(polygons: &[Polygon]) -> MultiPolygon {
    let mut result = MultiPolygon::new(vec![]);
    for poly in polygons {
        result = result.union(&MultiPolygon::new(vec![poly.clone()]));
    }
    result
}

/// Boolean union of two multi-polygons.
pub fn union(a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    if a.0.is_empty() {
        return b.clone();
    }
    if b.0.is_empty() {
        return a.clone();
    }
    a.union(b)
}

/// Boolean difference `a - b`.
pub fn difference(a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    if a.0.is_empty() || b.0.is_empty() {
        return a.clone();
    }
    a.difference(b)
}

/// Boolean intersection of two multi-polygons.
pub fn intersection(a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    if a.0.is_empty() || b.0.is_empty() {
        return MultiPolygon::new(vec![]);
    }
    a.intersection(b)
}

/// Contact lines between two multi-polygons: the parts of `b`'s boundary
/// lying on `a`.
pub fn shared_boundary(a: &MultiPolygon, b: &MultiPolygon) -> MultiLineString {
    let mut rings = Vec::new();
    for poly in &b.0 {
        rings.push(poly.exterior().clone());
        rings.extend(poly.interiors().iter().cloned());
    }
    let boundary = MultiLineString::new(rings);
    a.clip(&boundary, false)
}

/// Minimum distance between two multi-polygons; 0.0 when they intersect.
pub fn distance(a: &MultiPolygon, b: &MultiPolygon) -> f64 {
    if a.0.is_empty() || b.0.is_empty() {
        return f64::INFINITY;
    }
    if a.intersects(b) {
        return 0.0;
    }
    let mut min = f64::INFINITY;
    for pa in &a.0 {
        for pb in &b.0 {
            let d = pa.euclidean_distance(pb);
            if d < min {
                min = d;
            }
        }
    }
    min
}

/// Minimum distance from a multi-polygon to a point.
pub fn distance_to_point(shapes: &MultiPolygon, p: Point) -> f64 {
    let mut min = f64::INFINITY;
    for poly in &shapes.0 {
        let d = poly.euclidean_distance(&p);
        if d < min {
            min = d;
        }
    }
    min
}

/// Bounding box of a multi-polygon, or None when empty.
pub fn bounds_of(shapes: &MultiPolygon) -> Option<Bounds> {
    shapes.bounding_rect().map(Bounds::from)
}

/// True when the point lies strictly inside the shape (boundary excluded).
pub fn contains_point(shapes: &MultiPolygon, p: Point) -> bool {
    shapes.0.iter().any(|poly| poly.contains(&p))
}

/// True when the point lies inside or on the boundary of the shape.
pub fn covers_point(shapes: &MultiPolygon, p: Point) -> bool {
    shapes
        .0
        .iter()
        .any(|poly| poly.contains(&p) || poly.intersects(&p))
}

/// True when the two shapes share any point, boundary contact included.
pub fn intersects(a: &MultiPolygon, b: &MultiPolygon) -> bool {
    a.intersects(b)
}

/// True when the polyline touches or crosses the shape.
pub fn touches_line(shapes: &MultiPolygon, line: &LineString) -> bool {
    shapes.intersects(line)
}

/// Total enclosed area.
pub fn area(shapes: &MultiPolygon) -> f64 {
    shapes.unsigned_area()
}

/// Conventional winding: exterior rings counter-clockwise, interiors
/// clockwise. Ring walks in the tab builder assume this orientation.
pub fn normalize_winding(shapes: &MultiPolygon) -> MultiPolygon {
    shapes.orient(Direction::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_normalize_swapped_edges() {
        let b = Bounds::new(10.0, 8.0, 2.0, 1.0).normalized();
        assert_eq!(b, Bounds::new(2.0, 1.0, 10.0, 8.0));
        assert_eq!(b.width(), 8.0);
        assert_eq!(b.height(), 7.0);
    }

    #[test]
    fn place_rotates_clockwise_in_y_down_frame() {
        // A unit square rotated 90 degrees clockwise about the origin lands
        // in negative-y territory before translation.
        let square = rect_polygon(0.0, 0.0, 10.0, 4.0);
        let placed = place(&square, 90.0, 0.0, 0.0);
        let b = bounds_of(&MultiPolygon::new(vec![placed])).unwrap();
        assert!((b.x1 - 0.0).abs() < 1e-9);
        assert!((b.x2 - 4.0).abs() < 1e-9);
        assert!((b.y1 - -10.0).abs() < 1e-9);
        assert!((b.y2 - 0.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let err = polygon_from_points(&[(0.0, 0.0), (1.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::DegeneratePolygon { count: 2 });
    }

    #[test]
    fn duplicate_terminal_vertex_is_accepted() {
        let poly =
            polygon_from_points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 0.0)]).unwrap();
        assert_eq!(poly.exterior().0.len(), 4);
    }

    #[test]
    fn distance_is_zero_for_touching_shapes() {
        let a = MultiPolygon::new(vec![rect_polygon(0.0, 0.0, 2.0, 2.0)]);
        let b = MultiPolygon::new(vec![rect_polygon(2.0, 0.0, 4.0, 2.0)]);
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn distance_between_separated_rects() {
        let a = MultiPolygon::new(vec![rect_polygon(0.0, 0.0, 2.0, 2.0)]);
        let b = MultiPolygon::new(vec![rect_polygon(5.0, 0.0, 7.0, 2.0)]);
        assert!((distance(&a, &b) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn contains_point_excludes_boundary() {
        let shape = MultiPolygon::new(vec![rect_polygon(0.0, 0.0, 4.0, 4.0)]);
        assert!(contains_point(&shape, Point::new(2.0, 2.0)));
        assert!(!contains_point(&shape, Point::new(0.0, 2.0)));
        assert!(covers_point(&shape, Point::new(0.0, 2.0)));
    }
}
