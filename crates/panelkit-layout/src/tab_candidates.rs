//! Automatic tab candidate generation.
//!
//! Candidates are proposed per board edge, in the gap just outside the
//! edge, evenly subdividing it so no stretch longer than `max_tab_spacing`
//! goes unsupported. An edge facing no neighbour still generates
//! candidates; the tab builder's rays die in empty space and discard them.
//! An edge flush with the extreme of its neighbours has no gap to bridge
//! and is skipped outright.
//!
//! Candidate coordinates snap to a nanometre grid. De-duplication compares
//! spots from different boards for exact equality, and the same gap point
//! reached from either side (`x2 + gap/2` versus `x1 - gap/2`) must come
//! out as the same number.

use panelkit_geometry::{Bounds, Point};

use crate::board::PlacedBoard;
use crate::frame;
use crate::hole::Hole;
use crate::params::PanelParams;

/// A proposed tab location, not yet grown.
#[derive(Debug, Clone, Copy)]
pub struct TabCandidate {
    /// Gap point just off the board edge.
    pub point: Point,
    /// Unit direction from the gap into the board.
    pub inward: (f64, f64),
    /// Count of board lanes starting before this point on the tab axis.
    pub partition: usize,
    /// Subdivided edge length; shorter shares claim their spot first.
    pub score: f64,
}

/// Dedup key of an accepted tab.
#[derive(Debug, Clone, Copy)]
pub struct TabMarker {
    pub x: f64,
    pub y: f64,
    /// Componentwise absolute direction, identifying the axis.
    pub axis: (f64, f64),
    pub partition: usize,
}

impl TabMarker {
    pub fn for_candidate(c: &TabCandidate) -> Self {
        Self {
            x: c.point.x(),
            y: c.point.y(),
            axis: (c.inward.0.abs(), c.inward.1.abs()),
            partition: c.partition,
        }
    }
}

/// True when an accepted tab already serves this candidate's spot: same
/// axis, same partition lane, and within `tab_dist` along the edge.
pub fn is_served(accepted: &[TabMarker], candidate: &TabCandidate, tab_dist: f64) -> bool {
    let axis = (candidate.inward.0.abs(), candidate.inward.1.abs());
    accepted.iter().any(|t| {
        if t.axis != axis || t.partition != candidate.partition {
            return false;
        }
        if axis.1 == 1.0 {
            t.y == candidate.point.y() && (t.x - candidate.point.x()).abs() < tab_dist
        } else {
            t.x == candidate.point.x() && (t.y - candidate.point.y()).abs() < tab_dist
        }
    })
}

/// Generate all candidates for the current layout, sorted by score with
/// generation order preserved on ties.
pub fn generate(boards: &[PlacedBoard], holes: &[Hole], params: &PanelParams) -> Vec<TabCandidate> {
    let mut candidates = Vec::new();
    if !params.auto_tab || params.max_tab_spacing <= 0.0 {
        return candidates;
    }

    let x_parts: Vec<f64> = boards.iter().map(|b| quantize(b.nbbox().x1)).collect();
    let y_parts: Vec<f64> = boards.iter().map(|b| quantize(b.nbbox().y1)).collect();

    for board in boards {
        if board.disable_auto_tab || !board.manual_tab_anchors.is_empty() {
            continue;
        }

        let mut neighbours: Vec<Bounds> = boards
            .iter()
            .filter(|other| other.id() != board.id())
            .map(|other| other.nbbox())
            .collect();
        if params.use_frame {
            if params.tight {
                neighbours.push(frame::frame_bounds(params));
            } else {
                neighbours.extend(frame::rails(params).iter().map(|r| r.bounds));
            }
        }

        let own = board.nbbox();
        let row: Vec<Bounds> = neighbours
            .iter()
            .filter(|b| b.y_overlaps(&own))
            .copied()
            .collect();
        let col: Vec<Bounds> = neighbours
            .iter()
            .filter(|b| b.x_overlaps(&own))
            .copied()
            .collect();

        let col_min_y = col.iter().map(|b| b.y1).fold(f64::INFINITY, f64::min);
        let col_max_y = col.iter().map(|b| b.y2).fold(f64::NEG_INFINITY, f64::max);
        let row_min_x = row.iter().map(|b| b.x1).fold(f64::INFINITY, f64::min);
        let row_max_x = row.iter().map(|b| b.x2).fold(f64::NEG_INFINITY, f64::max);

        let half_gap = params.spacing / 2.0;

        if !col.is_empty() && own.y1 != col_min_y {
            subdivide(own.x1, own.x2, params.max_tab_spacing, |x, score| {
                candidates.push(TabCandidate {
                    point: Point::new(x, quantize(own.y1 - half_gap)),
                    inward: (0.0, 1.0),
                    partition: lanes_before(&x_parts, x),
                    score,
                });
            });
        }
        if !col.is_empty() && own.y2 != col_max_y {
            subdivide(own.x1, own.x2, params.max_tab_spacing, |x, score| {
                candidates.push(TabCandidate {
                    point: Point::new(x, quantize(own.y2 + half_gap)),
                    inward: (0.0, -1.0),
                    partition: lanes_before(&x_parts, x),
                    score,
                });
            });
        }
        if !row.is_empty() && own.x1 != row_min_x {
            subdivide(own.y1, own.y2, params.max_tab_spacing, |y, score| {
                candidates.push(TabCandidate {
                    point: Point::new(quantize(own.x1 - half_gap), y),
                    inward: (1.0, 0.0),
                    partition: lanes_before(&y_parts, y),
                    score,
                });
            });
        }
        if !row.is_empty() && own.x2 != row_max_x {
            subdivide(own.y1, own.y2, params.max_tab_spacing, |y, score| {
                candidates.push(TabCandidate {
                    point: Point::new(quantize(own.x2 + half_gap), y),
                    inward: (-1.0, 0.0),
                    partition: lanes_before(&y_parts, y),
                    score,
                });
            });
        }
    }

    candidates.retain(|c| !holes.iter().any(|h| h.contains(c.point)));
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates
}

/// Interior subdivision points of an edge: `ceil(len / max) + 1` segments,
/// one candidate per interior boundary.
fn subdivide(from: f64, to: f64, max_tab_spacing: f64, mut emit: impl FnMut(f64, f64)) {
    let len = to - from;
    let n = (len / max_tab_spacing).ceil() as usize + 1;
    for i in 1..n {
        emit(quantize(from + len * i as f64 / n as f64), len / n as f64);
    }
}

fn lanes_before(parts: &[f64], coordinate: f64) -> usize {
    parts.iter().filter(|p| **p < coordinate).count()
}

/// Snap a coordinate to the nanometre grid.
fn quantize(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
