//! Placement conflict detection.
//!
//! Boards, frame rails and cutout holes are pairwise intersected. Shared
//! material is an overlap; shared boundary without shared material is a
//! touch, which still matters because touching outlines merge into one
//! piece when the panel is routed. Framed layouts also flag board material
//! sticking out of the panel rectangle.

use panelkit_geometry::{primitives, MultiLineString, MultiPolygon};

use crate::board::{BoardId, PlacedBoard};
use crate::frame::{self, RailSide};
use crate::hole::Hole;
use crate::params::PanelParams;

/// One side of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictParty {
    Board(BoardId),
    Rail(RailSide),
    /// Index into the layout's hole list.
    Hole(usize),
    /// The panel rectangle itself.
    Frame,
}

impl std::fmt::Display for ConflictParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictParty::Board(id) => write!(f, "{id}"),
            ConflictParty::Rail(side) => write!(f, "{side} rail"),
            ConflictParty::Hole(i) => write!(f, "hole#{i}"),
            ConflictParty::Frame => write!(f, "frame"),
        }
    }
}

/// What kind of contact was found.
#[derive(Debug, Clone)]
pub enum ConflictKind {
    /// Material shared by both parties.
    Overlap(MultiPolygon),
    /// Boundary contact with no shared material.
    Touching(MultiLineString),
    /// Board material outside the panel rectangle.
    OutOfFrame(MultiPolygon),
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub first: ConflictParty,
    pub second: ConflictParty,
    pub kind: ConflictKind,
}

/// Scan the layout for overlaps, touches and out-of-frame material.
pub fn detect(boards: &[PlacedBoard], holes: &[Hole], params: &PanelParams) -> Vec<Conflict> {
    let mut pool: Vec<(ConflictParty, MultiPolygon)> = Vec::new();
    for b in boards {
        pool.push((ConflictParty::Board(b.id()), b.global_shapes()));
    }
    for rail in frame::rails(params) {
        pool.push((
            ConflictParty::Rail(rail.side),
            MultiPolygon::new(vec![rail.polygon()]),
        ));
    }
    for (i, h) in holes.iter().enumerate() {
        pool.push((
            ConflictParty::Hole(i),
            MultiPolygon::new(vec![h.global_shape()]),
        ));
    }

    let mut conflicts = Vec::new();
    for i in 0..pool.len() {
        for j in i + 1..pool.len() {
            let (first, a) = &pool[i];
            let (second, b) = &pool[j];
            let overlap = primitives::intersection(a, b);
            if !overlap.0.is_empty() {
                conflicts.push(Conflict {
                    first: *first,
                    second: *second,
                    kind: ConflictKind::Overlap(overlap),
                });
            } else if primitives::intersects(a, b) {
                conflicts.push(Conflict {
                    first: *first,
                    second: *second,
                    kind: ConflictKind::Touching(primitives::shared_boundary(a, b)),
                });
            }
        }
    }

    if params.use_frame {
        let panel_rect = MultiPolygon::new(vec![frame::frame_bounds(params).to_polygon()]);
        for b in boards {
            let outside = primitives::difference(&b.global_shapes(), &panel_rect);
            if !outside.0.is_empty() {
                conflicts.push(Conflict {
                    first: ConflictParty::Board(b.id()),
                    second: ConflictParty::Frame,
                    kind: ConflictKind::OutOfFrame(outside),
                });
            }
        }
    }
    conflicts
}
