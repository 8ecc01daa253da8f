//! Directional ray casting and swept collision.
//!
//! A ray here is a finite segment: long enough to pass through the whole
//! target, short enough to keep the intersection arithmetic local. Hits are
//! gathered per boundary edge, so a ray passing exactly through a ring
//! vertex reports one point, and a ray running along a boundary edge
//! reports the overlap as a segment plus distinct point hits where it
//! crosses the neighbouring edges.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString, MultiPolygon, Point};
use smallvec::SmallVec;

use crate::error::{GeometryError, Result};

/// Ray length as a multiple of the farthest origin-to-vertex distance.
///
/// Any boundary point of the target is a convex combination of its
/// vertices, so a segment of `longest_distance * RAY_REACH_FACTOR` always
/// reaches past the farthest boundary point in any direction.
pub const RAY_REACH_FACTOR: f64 = 2.0;

/// Coordinate tolerance for merging duplicate hits from adjacent edges.
const HIT_EPSILON: f64 = 1e-9;

/// A single ray-boundary contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayHit {
    /// The ray crosses the boundary at one point.
    Point(Point),
    /// The ray runs along a boundary edge; the overlapping section.
    Overlap(Line),
}

impl RayHit {
    /// The contact point, or None for an overlap section.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            RayHit::Point(p) => Some(*p),
            RayHit::Overlap(_) => None,
        }
    }

    fn distance_from(&self, origin: Point) -> f64 {
        match self {
            RayHit::Point(p) => dist(origin, *p),
            RayHit::Overlap(line) => {
                let a = dist(origin, line.start.into());
                let b = dist(origin, line.end.into());
                a.min(b)
            }
        }
    }
}

fn dist(a: Point, b: Point) -> f64 {
    ((a.x() - b.x()).powi(2) + (a.y() - b.y()).powi(2)).sqrt()
}

/// Scale a direction to unit length; None for the zero vector.
pub fn normalize(direction: (f64, f64)) -> Option<(f64, f64)> {
    let len = (direction.0 * direction.0 + direction.1 * direction.1).sqrt();
    if len == 0.0 {
        return None;
    }
    Some((direction.0 / len, direction.1 / len))
}

/// All exterior-ring vertices of a shape.
fn exterior_vertices(shapes: &MultiPolygon) -> Vec<Point> {
    let mut points = Vec::new();
    for poly in &shapes.0 {
        points.extend(poly.exterior().points());
    }
    points
}

/// Largest distance from `origin` to any exterior vertex of `shapes`.
pub fn longest_distance(origin: Point, shapes: &MultiPolygon) -> f64 {
    exterior_vertices(shapes)
        .into_iter()
        .map(|p| dist(origin, p))
        .fold(0.0, f64::max)
}

/// Insert `n - 1` evenly spaced points into every segment of a point chain.
///
/// The chain is treated as closed by the caller (last vertex equal to the
/// first); the terminal vertex itself is never emitted, so a closed ring
/// comes back without a duplicate seam point.
pub fn interpolate(points: &[Point], n: usize) -> Vec<Point> {
    let n = n.max(1);
    let mut ret = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        ret.push(a);
        let dx = (b.x() - a.x()) / n as f64;
        let dy = (b.y() - a.y()) / n as f64;
        for i in 1..n {
            ret.push(Point::new(a.x() + dx * i as f64, a.y() + dy * i as f64));
        }
    }
    ret
}

/// Cast a fixed-length segment from `origin` along `direction` against a
/// single ring, collecting raw hits edge by edge.
fn cast_segment(origin: Point, direction: (f64, f64), ring: &LineString, reach: f64) -> SmallVec<[RayHit; 4]> {
    let mut hits: SmallVec<[RayHit; 4]> = SmallVec::new();
    let Some(unit) = normalize(direction) else {
        return hits;
    };
    if reach <= 0.0 {
        return hits;
    }
    let tip = Coord {
        x: origin.x() + unit.0 * reach,
        y: origin.y() + unit.1 * reach,
    };
    let ray = Line::new(Coord { x: origin.x(), y: origin.y() }, tip);

    for edge in ring.lines() {
        match line_intersection(ray, edge) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                let p = Point::new(intersection.x, intersection.y);
                let duplicate = hits.iter().any(|h| match h {
                    RayHit::Point(q) => dist(*q, p) < HIT_EPSILON,
                    RayHit::Overlap(_) => false,
                });
                if !duplicate {
                    hits.push(RayHit::Point(p));
                }
            }
            Some(LineIntersection::Collinear { intersection }) => {
                hits.push(RayHit::Overlap(intersection));
            }
            None => {}
        }
    }
    hits
}

/// Cast a ray from `origin` along `direction` at the exterior boundary of
/// `target`, returning all hits ordered nearest first.
///
/// The segment length is the farthest origin-to-vertex distance times
/// [`RAY_REACH_FACTOR`]. An empty result means a clean miss, not an error.
pub fn shoot(origin: Point, target: &MultiPolygon, direction: (f64, f64)) -> Vec<RayHit> {
    let reach = longest_distance(origin, target) * RAY_REACH_FACTOR;
    let mut hits: Vec<RayHit> = Vec::new();
    for poly in &target.0 {
        for hit in cast_segment(origin, direction, poly.exterior(), reach) {
            let duplicate = match hit {
                RayHit::Point(p) => hits.iter().any(|h| match h {
                    RayHit::Point(q) => dist(*q, p) < HIT_EPSILON,
                    RayHit::Overlap(_) => false,
                }),
                RayHit::Overlap(_) => false,
            };
            if !duplicate {
                hits.push(hit);
            }
        }
    }
    hits.sort_by(|a, b| {
        a.distance_from(origin).total_cmp(&b.distance_from(origin))
    });
    hits
}

/// Nearest boundary hit of a fixed-reach ray against one ring.
///
/// Unlike [`shoot`] the search depth is explicit, and a miss is an error:
/// tab construction needs a boundary point or nothing.
pub fn closest_hit(origin: Point, direction: (f64, f64), ring: &LineString, reach: f64) -> Result<Point> {
    let mut nearest: Option<(f64, Point)> = None;
    for hit in cast_segment(origin, direction, ring, reach) {
        let candidates: SmallVec<[Point; 2]> = match hit {
            RayHit::Point(p) => SmallVec::from_slice(&[p]),
            RayHit::Overlap(line) => SmallVec::from_slice(&[line.start.into(), line.end.into()]),
        };
        for p in candidates {
            let d = dist(origin, p);
            if nearest.map_or(true, |(best, _)| d < best) {
                nearest = Some((d, p));
            }
        }
    }
    match nearest {
        Some((_, p)) => Ok(p),
        None => Err(GeometryError::NoIntersection {
            x: origin.x(),
            y: origin.y(),
            dx: direction.0,
            dy: direction.1,
        }),
    }
}

/// Arc of a closed ring between two boundary points, walked in ring
/// orientation and wrapping across the seam when needed.
///
/// Both points are projected onto their nearest ring edge first, so hits
/// produced by [`closest_hit`] land back on the ring despite intersection
/// roundoff. The result runs from `from` to `to` with every ring vertex
/// strictly inside the walked span in between.
pub fn boundary_arc(ring: &LineString, from: Point, to: Point) -> LineString {
    let total: f64 = ring
        .lines()
        .map(|l| dist(l.start.into(), l.end.into()))
        .sum();
    if total == 0.0 {
        return LineString::from(vec![(from.x(), from.y()), (to.x(), to.y())]);
    }
    let s_from = arc_position(ring, from);
    let s_to = arc_position(ring, to);
    let span = (s_to - s_from).rem_euclid(total);

    let mut inner: Vec<(f64, Coord)> = Vec::new();
    let mut walked = 0.0;
    // Segment starts enumerate every ring vertex exactly once; the closing
    // vertex repeats the first and never starts a segment of its own.
    for line in ring.lines() {
        let rel = (walked - s_from).rem_euclid(total);
        if rel > HIT_EPSILON && rel < span - HIT_EPSILON {
            inner.push((rel, line.start));
        }
        walked += dist(line.start.into(), line.end.into());
    }
    inner.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut coords = Vec::with_capacity(inner.len() + 2);
    coords.push(Coord { x: from.x(), y: from.y() });
    coords.extend(inner.into_iter().map(|(_, c)| c));
    coords.push(Coord { x: to.x(), y: to.y() });
    LineString::from(coords)
}

/// Distance along the ring of the projection of `p` onto its nearest edge.
fn arc_position(ring: &LineString, p: Point) -> f64 {
    let mut best = (f64::INFINITY, 0.0);
    let mut walked = 0.0;
    for line in ring.lines() {
        let a: Point = line.start.into();
        let b: Point = line.end.into();
        let len = dist(a, b);
        let t = if len == 0.0 {
            0.0
        } else {
            (((p.x() - a.x()) * (b.x() - a.x()) + (p.y() - a.y()) * (b.y() - a.y()))
                / (len * len))
                .clamp(0.0, 1.0)
        };
        let foot = Point::new(a.x() + (b.x() - a.x()) * t, a.y() + (b.y() - a.y()) * t);
        let d = dist(p, foot);
        if d < best.0 {
            best = (d, walked + len * t);
        }
        walked += len;
    }
    best.1
}

/// Boundary sample points of a shape: every exterior vertex plus each edge
/// midpoint.
fn sample_points(shapes: &MultiPolygon) -> Vec<Point> {
    let mut samples = Vec::new();
    for poly in &shapes.0 {
        let ring: Vec<Point> = poly.exterior().points().collect();
        samples.extend(interpolate(&ring, 2));
    }
    samples
}

/// Point hits of a cast, with tangential contacts discarded.
///
/// A result of exactly one point is a graze on a corner or a sliding edge
/// and does not count as contact. Overlap sections are dropped afterwards;
/// shapes sweeping flush along each other register through the midpoint
/// samples instead. A sweep that enters on a point and leaves along an
/// edge is indistinguishable from a graze here and is missed; callers
/// treat the resulting None as "unobstructed".
fn contact_points(hits: &[RayHit]) -> Vec<Point> {
    if hits.len() == 1 {
        if let RayHit::Point(_) = hits[0] {
            return Vec::new();
        }
    }
    hits.iter().filter_map(RayHit::as_point).collect()
}

/// First contact between `moving` swept along `direction` and `obstacle`.
///
/// Returns the pair of boundary points (on `moving`, on `obstacle`) where
/// the shapes would first touch, or None when the sweep never connects.
/// Both shapes are sampled at vertices and edge midpoints; the forward
/// pass casts from `moving` at `obstacle`, the reverse pass casts back
/// with the direction negated, and the closest contact over both passes
/// wins, first sample on ties.
pub fn collision(
    moving: &MultiPolygon,
    obstacle: &MultiPolygon,
    direction: (f64, f64),
) -> Option<(Point, Point)> {
    let mut best: Option<(f64, Point, Point)> = None;

    for a in sample_points(moving) {
        let hits = shoot(a, obstacle, direction);
        let points = contact_points(&hits);
        if let Some(&first) = points.first() {
            let d = dist(a, first);
            if best.map_or(true, |(b, _, _)| d < b) {
                best = Some((d, a, first));
            }
        }
    }

    let reverse = (-direction.0, -direction.1);
    for b in sample_points(obstacle) {
        let hits = shoot(b, moving, reverse);
        let points = contact_points(&hits);
        if let Some(&first) = points.first() {
            let d = dist(b, first);
            if best.map_or(true, |(best_d, _, _)| d < best_d) {
                best = Some((d, first, b));
            }
        }
    }

    best.map(|(_, on_moving, on_obstacle)| (on_moving, on_obstacle))
}
