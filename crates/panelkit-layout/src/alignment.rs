//! Directional board snapping.
//!
//! Each operation sweeps boards toward one frame edge. Obstruction limits
//! come from the swept-collision engine, so rotated and irregular outlines
//! stop where their material actually meets, not where bounding boxes say
//! they would. Snapping a single board additionally quantizes onto a grid
//! of alignment lines collected from the other boards.

use panelkit_geometry::raycast;
use panelkit_geometry::Point;

use crate::board::{BoardId, PlacedBoard};
use crate::params::PanelParams;

fn gap(a: Point, b: Point) -> f64 {
    ((a.x() - b.x()).powi(2) + (a.y() - b.y()).powi(2)).sqrt()
}

/// Swept distance until `moving` touches `obstacle` along `direction`, or
/// None when the sweep never connects.
fn sweep_gap(moving: &PlacedBoard, obstacle: &PlacedBoard, direction: (f64, f64)) -> Option<f64> {
    raycast::collision(&moving.global_shapes(), &obstacle.global_shapes(), direction)
        .map(|(on_moving, on_obstacle)| gap(on_moving, on_obstacle))
}

/// Largest grid line strictly below `edge`, if any.
fn largest_below(grid: &[f64], edge: f64) -> Option<f64> {
    grid.iter().copied().filter(|v| *v < edge).fold(None, |acc, v| {
        Some(acc.map_or(v, |a: f64| a.max(v)))
    })
}

/// Smallest grid line strictly above `edge`, if any.
fn smallest_above(grid: &[f64], edge: f64) -> Option<f64> {
    grid.iter().copied().filter(|v| *v > edge).fold(None, |acc, v| {
        Some(acc.map_or(v, |a: f64| a.min(v)))
    })
}

fn smallest(grid: &[f64]) -> Option<f64> {
    grid.iter().copied().fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

fn largest(grid: &[f64]) -> Option<f64> {
    grid.iter().copied().fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

/// Sorted processing order and, for single-board snaps, the span of
/// positions to process.
fn plan(
    boards: &[PlacedBoard],
    only: Option<BoardId>,
    mut key: impl FnMut(&PlacedBoard) -> f64,
) -> Option<(Vec<usize>, std::ops::Range<usize>)> {
    let mut order: Vec<usize> = (0..boards.len()).collect();
    order.sort_by(|&a, &b| key(&boards[a]).total_cmp(&key(&boards[b])));
    let span = match only {
        Some(id) => {
            let pos = order.iter().position(|&i| boards[i].id() == id)?;
            pos..pos + 1
        }
        None => 0..order.len(),
    };
    Some((order, span))
}

/// Push boards toward the frame top. With `only`, just that board moves,
/// aligning to the grid of lines the other boards define.
pub fn snap_top(boards: &mut [PlacedBoard], params: &PanelParams, only: Option<BoardId>) {
    let Some((order, span)) = plan(boards, only, |b| b.nbbox().y1) else {
        return;
    };
    let topmost = params.frame_top
        + if params.frame_top > 0.0 {
            params.spacing
        } else {
            0.0
        };

    let grid: Option<Vec<f64>> = only.map(|id| {
        let target = boards.iter().find(|b| b.id() == id);
        let rheight = target.map_or(0.0, |b| b.rheight());
        let mut lines = vec![topmost];
        for b in boards.iter().filter(|b| b.id() != id) {
            let n = b.nbbox();
            lines.push(n.y1);
            lines.push(n.y2 + params.spacing);
            lines.push(n.y2 - rheight);
        }
        lines
    });

    for pos in span {
        let idx = order[pos];
        let edge = boards[idx].nbbox().y1;
        let mut limit: Option<f64> = None;
        for &prev in &order[..pos] {
            if let Some(d) = sweep_gap(&boards[idx], &boards[prev], (0.0, -1.0)) {
                let stop = edge - d + params.spacing;
                limit = Some(limit.map_or(stop, |l: f64| l.max(stop)));
            }
        }
        let new_top = match (&grid, limit) {
            (None, Some(l)) => l,
            (None, None) => topmost,
            (Some(g), Some(l)) => largest_below(g, edge).filter(|v| *v >= l).unwrap_or(l),
            (Some(g), None) => largest_below(g, edge).or_else(|| smallest(g)).unwrap_or(edge),
        };
        boards[idx].set_top(new_top);
    }
}

/// Push boards toward the frame bottom.
pub fn snap_bottom(boards: &mut [PlacedBoard], params: &PanelParams, only: Option<BoardId>) {
    let Some((order, span)) = plan(boards, only, |b| -b.nbbox().y2) else {
        return;
    };
    let bottommost = params.frame_height
        - params.frame_bottom
        - if params.frame_bottom > 0.0 {
            params.spacing
        } else {
            0.0
        };

    let grid: Option<Vec<f64>> = only.map(|id| {
        let target = boards.iter().find(|b| b.id() == id);
        let rheight = target.map_or(0.0, |b| b.rheight());
        let mut lines = vec![bottommost];
        for b in boards.iter().filter(|b| b.id() != id) {
            let n = b.nbbox();
            lines.push(n.y1 - params.spacing);
            lines.push(n.y2);
            lines.push(n.y1 + rheight);
        }
        lines
    });

    for pos in span {
        let idx = order[pos];
        let edge = boards[idx].nbbox().y2;
        let mut limit: Option<f64> = None;
        for &prev in &order[..pos] {
            if let Some(d) = sweep_gap(&boards[idx], &boards[prev], (0.0, 1.0)) {
                let stop = edge + d - params.spacing;
                limit = Some(limit.map_or(stop, |l: f64| l.min(stop)));
            }
        }
        let new_bottom = match (&grid, limit) {
            (None, Some(l)) => l,
            (None, None) => bottommost,
            (Some(g), Some(l)) => smallest_above(g, edge).filter(|v| *v <= l).unwrap_or(l),
            (Some(g), None) => smallest_above(g, edge).or_else(|| largest(g)).unwrap_or(edge),
        };
        boards[idx].set_bottom(new_bottom);
    }
}

/// Push boards toward the frame left edge.
pub fn snap_left(boards: &mut [PlacedBoard], params: &PanelParams, only: Option<BoardId>) {
    let Some((order, span)) = plan(boards, only, |b| b.nbbox().x1) else {
        return;
    };
    let leftmost = params.frame_left
        + if params.frame_left > 0.0 {
            params.spacing
        } else {
            0.0
        };

    let grid: Option<Vec<f64>> = only.map(|id| {
        let target = boards.iter().find(|b| b.id() == id);
        let rwidth = target.map_or(0.0, |b| b.rwidth());
        let mut lines = vec![leftmost];
        for b in boards.iter().filter(|b| b.id() != id) {
            let n = b.nbbox();
            lines.push(n.x1);
            lines.push(n.x2 + params.spacing);
            lines.push(n.x2 - rwidth);
        }
        lines
    });

    for pos in span {
        let idx = order[pos];
        let edge = boards[idx].nbbox().x1;
        let mut limit: Option<f64> = None;
        for &prev in &order[..pos] {
            if let Some(d) = sweep_gap(&boards[idx], &boards[prev], (-1.0, 0.0)) {
                let stop = edge - d + params.spacing;
                limit = Some(limit.map_or(stop, |l: f64| l.max(stop)));
            }
        }
        let new_left = match (&grid, limit) {
            (None, Some(l)) => l,
            (None, None) => leftmost,
            (Some(g), Some(l)) => largest_below(g, edge).filter(|v| *v >= l).unwrap_or(l),
            (Some(g), None) => largest_below(g, edge).or_else(|| smallest(g)).unwrap_or(edge),
        };
        boards[idx].set_left(new_left);
    }
}

/// Push boards toward the frame right edge.
pub fn snap_right(boards: &mut [PlacedBoard], params: &PanelParams, only: Option<BoardId>) {
    let Some((order, span)) = plan(boards, only, |b| -b.nbbox().x2) else {
        return;
    };
    let rightmost = params.frame_width
        - params.frame_right
        - if params.frame_right > 0.0 {
            params.spacing
        } else {
            0.0
        };

    let grid: Option<Vec<f64>> = only.map(|id| {
        let target = boards.iter().find(|b| b.id() == id);
        let rwidth = target.map_or(0.0, |b| b.rwidth());
        let mut lines = vec![rightmost];
        for b in boards.iter().filter(|b| b.id() != id) {
            let n = b.nbbox();
            lines.push(n.x1 - params.spacing);
            lines.push(n.x2);
            lines.push(n.x1 + rwidth);
        }
        lines
    });

    for pos in span {
        let idx = order[pos];
        let edge = boards[idx].nbbox().x2;
        let mut limit: Option<f64> = None;
        for &prev in &order[..pos] {
            if let Some(d) = sweep_gap(&boards[idx], &boards[prev], (1.0, 0.0)) {
                let stop = edge + d - params.spacing;
                limit = Some(limit.map_or(stop, |l: f64| l.min(stop)));
            }
        }
        let new_right = match (&grid, limit) {
            (None, Some(l)) => l,
            (None, None) => rightmost,
            (Some(g), Some(l)) => smallest_above(g, edge).filter(|v| *v <= l).unwrap_or(l),
            (Some(g), None) => smallest_above(g, edge).or_else(|| largest(g)).unwrap_or(edge),
        };
        boards[idx].set_right(new_right);
    }
}
