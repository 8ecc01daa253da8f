//! Ground-truth cases for the ray-cast engine, including the documented
//! sweep limitations that downstream alignment relies on.

use panelkit_geometry::raycast::{collision, interpolate, shoot, RayHit};
use panelkit_geometry::{LineString, MultiPolygon, Point, Polygon};

fn poly(coords: &[(f64, f64)]) -> Polygon {
    Polygon::new(LineString::from(coords.to_vec()), vec![])
}

fn shape(coords: &[(f64, f64)]) -> MultiPolygon {
    MultiPolygon::new(vec![poly(coords)])
}

fn assert_point(actual: Point, x: f64, y: f64) {
    assert!(
        (actual.x() - x).abs() < 1e-9 && (actual.y() - y).abs() < 1e-9,
        "expected ({x}, {y}), got ({}, {})",
        actual.x(),
        actual.y()
    );
}

#[test]
fn diagonal_ray_hits_both_corners_once() {
    let target = shape(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
    let hits = shoot(Point::new(0.0, 0.0), &target, (1.0, 1.0));

    let points: Vec<Point> = hits.iter().filter_map(RayHit::as_point).collect();
    assert_eq!(points.len(), 2);
    assert_point(points[0], 1.0, 1.0);
    assert_point(points[1], 2.0, 2.0);
}

#[test]
fn ray_beside_the_target_misses() {
    let target = shape(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
    let hits = shoot(Point::new(0.0, 0.0), &target, (1.0, 0.0));
    assert!(hits.is_empty());
}

#[test]
fn facing_squares_collide_at_the_near_corner() {
    // Two unit squares four apart on the y axis, swept together. The
    // winning contact pair follows the ring walk order: the first sample
    // at the minimum sweep distance wins.
    let a = shape(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
    let b = shape(&[(1.0, 5.0), (1.0, 6.0), (2.0, 6.0), (2.0, 5.0)]);

    let (on_a, on_b) = collision(&a, &b, (0.0, 1.0)).expect("shapes face each other");
    assert_point(on_a, 1.0, 2.0);
    assert_point(on_b, 1.0, 5.0);
}

#[test]
fn collision_is_none_when_sweeps_never_meet() {
    let a = shape(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let b = shape(&[(5.0, 0.0), (5.0, 2.0), (7.0, 2.0), (7.0, 0.0)]);
    assert_eq!(collision(&a, &b, (0.0, 1.0)), None);
}

#[test]
fn corner_to_corner_graze_counts_as_no_contact() {
    // Two diamonds whose tips sit at the same height, swept horizontally.
    // Every ray either misses or clips a single vertex; single-point
    // results are tangential and discarded, so the sweep reports no
    // contact even though the tips would touch.
    let a = shape(&[(1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (2.0, 2.0)]);
    let b = shape(&[(6.0, 2.0), (7.0, 3.0), (6.0, 4.0), (5.0, 3.0)]);
    assert_eq!(collision(&a, &b, (1.0, 0.0)), None);
}

#[test]
fn aligned_edges_register_at_the_sweep_gap() {
    // Same-width squares, edge perfectly facing edge. Corner rays run
    // along the obstacle's side walls; the crossings at the far corners
    // keep those casts from being discarded as tangential, and the sweep
    // distance comes out as the true 4 mm gap.
    let a = shape(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let b = shape(&[(0.0, 6.0), (0.0, 8.0), (2.0, 8.0), (2.0, 6.0)]);

    let (on_a, on_b) = collision(&a, &b, (0.0, 1.0)).expect("facing edges collide");
    let travelled = ((on_b.x() - on_a.x()).powi(2) + (on_b.y() - on_a.y()).powi(2)).sqrt();
    assert!((travelled - 4.0).abs() < 1e-9);
}

#[test]
fn touching_shapes_report_zero_distance_contact() {
    // Squares already flush side by side report a contact at distance
    // zero regardless of the sweep direction; the sample sitting on the
    // obstacle boundary hits immediately.
    let a = shape(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let b = shape(&[(2.0, 0.0), (2.0, 2.0), (4.0, 2.0), (4.0, 0.0)]);

    let (on_a, on_b) = collision(&a, &b, (1.0, 0.0)).expect("flush shapes touch");
    let travelled = ((on_b.x() - on_a.x()).powi(2) + (on_b.y() - on_a.y()).powi(2)).sqrt();
    assert!(travelled < 1e-9);
}

#[test]
fn interpolate_walks_open_chains_without_the_last_point() {
    let chain = vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
    let samples = interpolate(&chain, 4);
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0], Point::new(0.0, 0.0));
    assert_eq!(samples[1], Point::new(1.0, 0.0));
    assert_eq!(samples[3], Point::new(3.0, 0.0));
}
