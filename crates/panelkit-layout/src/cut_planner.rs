//! Cut classification: V-groove or perforated row per tab face.
//!
//! A V-cut machine scores a straight line across the whole panel, so a
//! groove is only offered where that line stays clear of every board
//! footprint. A face whose line would run through some board's bounding
//! span is perforated with mouse bites instead and breaks only locally.

use geo::EuclideanLength;

use panelkit_geometry::{Bounds, LineString, Point};

use crate::board::PlacedBoard;
use crate::params::{CutMethod, PanelParams};

/// Extra groove length past the panel extent, in millimetres.
pub const VC_EXTENT: f64 = 3.0;

/// Cut line orientation, judged by its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutAxis {
    Vertical,
    Horizontal,
    Diagonal,
}

/// A straight scoring groove across the panel.
#[derive(Debug, Clone)]
pub struct VCut {
    pub line: LineString,
}

/// A perforated breakaway row along a cut line.
#[derive(Debug, Clone)]
pub struct MouseBiteRow {
    pub line: LineString,
    pub centers: Vec<Point>,
    pub diameter: f64,
}

pub fn axis_of(line: &LineString) -> CutAxis {
    let coords = &line.0;
    match (coords.first(), coords.last()) {
        (Some(a), Some(b)) if a.x == b.x => CutAxis::Vertical,
        (Some(a), Some(b)) if a.y == b.y => CutAxis::Horizontal,
        _ => CutAxis::Diagonal,
    }
}

/// Partition cut lines into grooves and perforated rows per the configured
/// method.
pub fn classify(
    cuts: &[LineString],
    boards: &[PlacedBoard],
    substrate_bounds: Option<Bounds>,
    params: &PanelParams,
) -> (Vec<VCut>, Vec<MouseBiteRow>) {
    let mut vcuts = Vec::new();
    let mut bites = Vec::new();

    for line in cuts {
        match params.cut_method {
            CutMethod::MouseBites => {
                bites.push(bite_row(line, params));
            }
            CutMethod::VCut => {
                vcuts.push(groove(line, substrate_bounds));
            }
            CutMethod::Auto => {
                if crosses_a_board(line, boards) {
                    bites.push(bite_row(line, params));
                } else {
                    vcuts.push(groove(line, substrate_bounds));
                }
            }
            CutMethod::Both => {
                if !crosses_a_board(line, boards) {
                    vcuts.push(groove(line, substrate_bounds));
                }
                bites.push(bite_row(line, params));
            }
        }
    }
    (vcuts, bites)
}

/// True when the full scoring line of this cut would run through some
/// board's bounding span. Strict comparison: a face lying exactly on a
/// bounding edge does not cross it.
fn crosses_a_board(line: &LineString, boards: &[PlacedBoard]) -> bool {
    let Some(first) = line.0.first() else {
        return false;
    };
    match axis_of(line) {
        CutAxis::Vertical => boards.iter().any(|b| {
            let n = b.nbbox();
            n.x1 < first.x && first.x < n.x2
        }),
        CutAxis::Horizontal => boards.iter().any(|b| {
            let n = b.nbbox();
            n.y1 < first.y && first.y < n.y2
        }),
        CutAxis::Diagonal => false,
    }
}

/// The scoring groove for a cut: axis-aligned cuts span the whole panel
/// extent plus [`VC_EXTENT`] on both ends, diagonal cuts keep their line.
fn groove(line: &LineString, substrate_bounds: Option<Bounds>) -> VCut {
    let Some(bounds) = substrate_bounds else {
        return VCut { line: line.clone() };
    };
    let Some(first) = line.0.first() else {
        return VCut { line: line.clone() };
    };
    let groove = match axis_of(line) {
        CutAxis::Vertical => LineString::from(vec![
            (first.x, bounds.y1 - VC_EXTENT),
            (first.x, bounds.y2 + VC_EXTENT),
        ]),
        CutAxis::Horizontal => LineString::from(vec![
            (bounds.x1 - VC_EXTENT, first.y),
            (bounds.x2 + VC_EXTENT, first.y),
        ]),
        CutAxis::Diagonal => line.clone(),
    };
    VCut { line: groove }
}

/// Perforation centers every `mb_spacing` along the line's arc length,
/// from its first endpoint up to and including the last full pitch.
fn bite_row(line: &LineString, params: &PanelParams) -> MouseBiteRow {
    let pitch = params.mb_spacing;
    let length = line.euclidean_length();
    let mut centers = Vec::new();
    if pitch > 0.0 {
        let mut i = 0usize;
        while i as f64 * pitch <= length {
            centers.push(walk(line, i as f64 * pitch));
            i += 1;
        }
    }
    MouseBiteRow {
        line: line.clone(),
        centers,
        diameter: params.mb_diameter,
    }
}

/// Point at `distance` along the polyline's arc length, clamped to its
/// endpoints.
fn walk(line: &LineString, distance: f64) -> Point {
    let mut remaining = distance.max(0.0);
    for seg in line.lines() {
        let len = seg.euclidean_length();
        if remaining <= len {
            if len == 0.0 {
                return seg.start.into();
            }
            let t = remaining / len;
            return Point::new(
                seg.start.x + (seg.end.x - seg.start.x) * t,
                seg.start.y + (seg.end.y - seg.start.y) * t,
            );
        }
        remaining -= len;
    }
    match line.0.last() {
        Some(c) => Point::new(c.x, c.y),
        None => Point::new(0.0, 0.0),
    }
}
