//! Whole-panel assembly.
//!
//! [`rebuild`] recomputes the panel from scratch on every call: substrate
//! seeding, tab growth, mill simulation, cut classification and conflict
//! detection run in one pass over an immutable [`LayoutState`]. Recoverable
//! per-tab failures are logged and skipped, so one bad tab request never
//! costs the whole build.

use tracing::debug;

use panelkit_geometry::{offset, primitives, Bounds};
use panelkit_geometry::{LineString, MultiPolygon, Point, Polygon};

use crate::board::PlacedBoard;
use crate::conflicts::{self, Conflict};
use crate::cut_planner::{self, MouseBiteRow, VCut};
use crate::error::Result;
use crate::frame;
use crate::hole::Hole;
use crate::params::PanelParams;
use crate::tab_builder::{self, Tab};
use crate::tab_candidates::{self, TabMarker};

/// Tab solids below this area are slivers from degenerate anchor
/// placements and are not merged into the body.
const MIN_TAB_AREA: f64 = 1e-9;

/// Everything a panel is computed from.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub params: PanelParams,
    pub boards: Vec<PlacedBoard>,
    pub holes: Vec<Hole>,
}

/// One complete build.
#[derive(Debug, Clone)]
pub struct PanelResult {
    /// Merged panel body: rails, boards, tight fill and tab material.
    pub substrate: MultiPolygon,
    /// Constructed tabs, in growth order.
    pub tabs: Vec<Tab>,
    /// Accepted automatic tab spots, the de-duplication record.
    pub markers: Vec<TabMarker>,
    pub vcuts: Vec<VCut>,
    pub bites: Vec<MouseBiteRow>,
    pub conflicts: Vec<Conflict>,
}

impl PanelResult {
    /// The build of an empty board list.
    pub fn empty() -> Self {
        Self {
            substrate: MultiPolygon::new(Vec::new()),
            tabs: Vec::new(),
            markers: Vec::new(),
            vcuts: Vec::new(),
            bites: Vec::new(),
            conflicts: Vec::new(),
        }
    }
}

/// Rebuild the panel from the given state.
///
/// The result is a pure function of the state; calling twice on the same
/// state yields the same panel.
pub fn rebuild(state: &LayoutState) -> Result<PanelResult> {
    let params = &state.params;
    if state.boards.is_empty() {
        return Ok(PanelResult::empty());
    }

    let mut substrate = MultiPolygon::new(Vec::new());
    if params.use_frame && !params.tight {
        for rail in frame::rails(params) {
            let piece = MultiPolygon::new(vec![rail.polygon()]);
            substrate = primitives::union(&substrate, &piece);
        }
    }
    for board in &state.boards {
        substrate = primitives::union(&substrate, &board.global_shapes());
    }
    if params.tight {
        let body = tight_body(&state.boards, &state.holes, params);
        substrate = primitives::union(&substrate, &body);
    }

    let mut tabs: Vec<Tab> = Vec::new();
    let mut cuts: Vec<LineString> = Vec::new();
    let mut markers: Vec<TabMarker> = Vec::new();

    // Manual tabs first; they are not deduplicated against each other or
    // against the automatic candidates.
    for board in &state.boards {
        for anchor in &board.manual_tab_anchors {
            let origin = board.global_point(Point::new(anchor.x, anchor.y));
            let outward = board.global_direction(anchor.direction.vector());
            grow_pair(&substrate, origin, outward, params, &state.boards, &mut tabs, &mut cuts);
        }
    }

    let tab_dist = params.max_tab_spacing / 3.0;
    let candidates = tab_candidates::generate(&state.boards, &state.holes, params);
    for candidate in &candidates {
        if tab_candidates::is_served(&markers, candidate, tab_dist) {
            continue;
        }
        let outward = (-candidate.inward.0, -candidate.inward.1);
        let grown = grow_pair(
            &substrate,
            candidate.point,
            outward,
            params,
            &state.boards,
            &mut tabs,
            &mut cuts,
        );
        if grown {
            markers.push(TabMarker::for_candidate(candidate));
        }
    }

    // Merge only after the walk so ray-casts never saw accepted tabs.
    for tab in &tabs {
        let piece = MultiPolygon::new(vec![tab.solid.clone()]);
        if primitives::area(&piece) <= MIN_TAB_AREA {
            continue;
        }
        substrate = primitives::union(&substrate, &piece);
    }

    if params.mill_fillets > 0.0 {
        substrate = offset::close_rounded(&substrate, params.mill_fillets);
    }

    let bounds = primitives::bounds_of(&substrate);
    let (vcuts, bites) = cut_planner::classify(&cuts, &state.boards, bounds, params);
    let conflicts = conflicts::detect(&state.boards, &state.holes, params);

    debug!(
        boards = state.boards.len(),
        tabs = tabs.len(),
        vcuts = vcuts.len(),
        bites = bites.len(),
        conflicts = conflicts.len(),
        "panel rebuilt"
    );

    Ok(PanelResult {
        substrate,
        tabs,
        markers,
        vcuts,
        bites,
        conflicts,
    })
}

/// Shrink-wrapped panel fill: the joint bounding box of all boards (plus
/// the frame rectangle when framing is on), minus every board footprint
/// grown by the spacing, minus every hole.
fn tight_body(boards: &[PlacedBoard], holes: &[Hole], params: &PanelParams) -> MultiPolygon {
    let mut hull: Option<Bounds> = None;
    for board in boards {
        let b = board.nbbox();
        hull = Some(match hull {
            Some(h) => h.union(&b),
            None => b,
        });
    }
    let Some(mut hull) = hull else {
        return MultiPolygon::new(Vec::new());
    };
    if params.use_frame {
        hull = hull.union(&frame::frame_bounds(params));
    }

    let mut body = MultiPolygon::new(vec![hull.to_polygon()]);
    for board in boards {
        // Carve by the exterior ring only; board cutouts stay open.
        let footprints: Vec<Polygon> = board
            .global_shapes()
            .0
            .iter()
            .map(|piece| Polygon::new(piece.exterior().clone(), Vec::new()))
            .collect();
        let grown = offset::offset(&MultiPolygon::new(footprints), params.spacing);
        body = primitives::difference(&body, &grown);
    }
    for hole in holes {
        let cut = MultiPolygon::new(vec![hole.global_shape()]);
        body = primitives::difference(&body, &cut);
    }
    body
}

/// Grow the outward tab at `origin` and, when it lands, the inward
/// counterpart. The outward face becomes a cut only when it rests on a
/// board outline; the inward face always does.
///
/// Returns whether the outward tab was built.
fn grow_pair(
    substrate: &MultiPolygon,
    origin: Point,
    outward: (f64, f64),
    params: &PanelParams,
    boards: &[PlacedBoard],
    tabs: &mut Vec<Tab>,
    cuts: &mut Vec<LineString>,
) -> bool {
    let width = params.tab_width;
    let radius = params.mill_fillets;

    let out_tab = match tab_builder::build_tab(substrate, origin, outward, width, radius) {
        Ok(tab) => tab,
        Err(err) => {
            debug!(x = origin.x(), y = origin.y(), "tab skipped: {err}");
            return false;
        }
    };
    let on_board = boards
        .iter()
        .any(|b| primitives::touches_line(&b.global_shapes(), &out_tab.face));
    if on_board {
        cuts.push(out_tab.face.clone());
    }
    tabs.push(out_tab);

    let inward = (-outward.0, -outward.1);
    match tab_builder::build_tab(substrate, origin, inward, width, radius) {
        Ok(tab) => {
            cuts.push(tab.face.clone());
            tabs.push(tab);
        }
        Err(err) => {
            debug!(x = origin.x(), y = origin.y(), "counterpart tab skipped: {err}");
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::board::{AnchorDirection, BoardId, TabAnchor};

    fn rect_board(id: u64, w: f64, h: f64, x: f64, y: f64) -> PlacedBoard {
        let mut board = PlacedBoard::new(
            BoardId(id),
            Path::new("boards/demo.board.json"),
            vec![primitives::rect_polygon(0.0, 0.0, w, h)],
        );
        board.x = x;
        board.y = y;
        board
    }

    fn frameless_params() -> PanelParams {
        PanelParams {
            use_frame: false,
            tight: false,
            mill_fillets: 0.0,
            ..PanelParams::default()
        }
    }

    #[test]
    fn empty_layout_builds_an_empty_panel() {
        let state = LayoutState::default();
        let panel = rebuild(&state).unwrap();
        assert!(panel.substrate.0.is_empty());
        assert!(panel.tabs.is_empty());
        assert!(panel.vcuts.is_empty());
        assert!(panel.bites.is_empty());
        assert!(panel.conflicts.is_empty());
    }

    #[test]
    fn two_boards_bridge_with_one_tab_pair() {
        let state = LayoutState {
            params: frameless_params(),
            boards: vec![
                rect_board(1, 40.0, 30.0, 0.0, 0.0),
                rect_board(2, 40.0, 30.0, 41.6, 0.0),
            ],
            holes: Vec::new(),
        };
        let panel = rebuild(&state).unwrap();

        // One outward and one inward tab across the shared seam; every
        // other candidate is deduplicated or misses into open space.
        assert_eq!(panel.tabs.len(), 2);
        assert_eq!(panel.markers.len(), 1);
        let area = primitives::area(&panel.substrate);
        let expected = 2.0 * 1200.0 + 2.0 * (0.8 * 3.6);
        assert!((area - expected).abs() < 1e-6, "area {area}");

        // Both faces rest on board edges, outside every footprint
        // interior: full-length grooves.
        assert_eq!(panel.vcuts.len(), 2);
        assert!(panel.bites.is_empty());
        assert!(panel.conflicts.is_empty());
    }

    #[test]
    fn suppressed_boards_grow_no_tabs() {
        let mut a = rect_board(1, 40.0, 30.0, 0.0, 0.0);
        let mut b = rect_board(2, 40.0, 30.0, 41.6, 0.0);
        a.disable_auto_tab = true;
        b.disable_auto_tab = true;
        let state = LayoutState {
            params: frameless_params(),
            boards: vec![a, b],
            holes: Vec::new(),
        };
        let panel = rebuild(&state).unwrap();
        assert!(panel.tabs.is_empty());
        assert!(panel.vcuts.is_empty());
        assert!(panel.bites.is_empty());
        let area = primitives::area(&panel.substrate);
        assert!((area - 2400.0).abs() < 1e-6);
    }

    #[test]
    fn manual_anchor_bridges_suppressed_boards() {
        let mut a = rect_board(1, 40.0, 30.0, 0.0, 0.0);
        let mut b = rect_board(2, 40.0, 30.0, 41.6, 0.0);
        a.disable_auto_tab = true;
        b.disable_auto_tab = true;
        a.manual_tab_anchors.push(TabAnchor {
            x: 40.8,
            y: 15.0,
            direction: AnchorDirection::Right,
        });
        let state = LayoutState {
            params: frameless_params(),
            boards: vec![a, b],
            holes: Vec::new(),
        };
        let panel = rebuild(&state).unwrap();

        assert_eq!(panel.tabs.len(), 2);
        let outward_face = &panel.tabs[0].face;
        let inward_face = &panel.tabs[1].face;
        assert!(outward_face.0.iter().all(|c| (c.x - 41.6).abs() < 1e-9));
        assert!(inward_face.0.iter().all(|c| (c.x - 40.0).abs() < 1e-9));

        let area = primitives::area(&panel.substrate);
        let expected = 2.0 * 1200.0 + 2.0 * (0.8 * 3.6);
        assert!((area - expected).abs() < 1e-6, "area {area}");
    }

    #[test]
    fn tight_fill_spans_the_gap_and_skips_holes() {
        let params = PanelParams {
            use_frame: false,
            tight: true,
            auto_tab: false,
            mill_fillets: 0.0,
            ..PanelParams::default()
        };
        let hole = Hole::from_points(&[(43.0, 10.0), (46.0, 10.0), (46.0, 14.0), (43.0, 14.0)])
            .unwrap();
        let state = LayoutState {
            params,
            boards: vec![
                rect_board(1, 40.0, 30.0, 0.0, 0.0),
                rect_board(2, 40.0, 30.0, 50.0, 0.0),
            ],
            holes: vec![hole],
        };
        let panel = rebuild(&state).unwrap();

        // Fill strip x 41.6..48.4 over the full height, minus the 3x4 hole.
        let expected = 2.0 * 1200.0 + 6.8 * 30.0 - 12.0;
        let area = primitives::area(&panel.substrate);
        assert!((area - expected).abs() < 1e-6, "area {area}");
        assert!(panel.conflicts.is_empty());
    }

    #[test]
    fn rails_seed_the_body_in_plain_framed_mode() {
        let params = PanelParams {
            tight: false,
            auto_tab: false,
            mill_fillets: 0.0,
            ..PanelParams::default()
        };
        let state = LayoutState {
            params,
            boards: vec![rect_board(1, 40.0, 30.0, 30.0, 36.6)],
            holes: Vec::new(),
        };
        let panel = rebuild(&state).unwrap();

        // Top and bottom rails are 100 x 5 each; the side margins default
        // to zero and contribute nothing.
        let area = primitives::area(&panel.substrate);
        assert!((area - (1200.0 + 1000.0)).abs() < 1e-6, "area {area}");
        assert!(panel.conflicts.is_empty());
    }

    #[test]
    fn mill_fillets_add_material_at_junctions() {
        let plain = LayoutState {
            params: frameless_params(),
            boards: vec![
                rect_board(1, 40.0, 30.0, 0.0, 0.0),
                rect_board(2, 40.0, 30.0, 41.6, 0.0),
            ],
            holes: Vec::new(),
        };
        let mut filleted = plain.clone();
        filleted.params.mill_fillets = 0.5;

        let base = primitives::area(&rebuild(&plain).unwrap().substrate);
        let rounded = primitives::area(&rebuild(&filleted).unwrap().substrate);
        assert!(rounded > base + 0.01, "base {base} rounded {rounded}");
    }

    #[test]
    fn rebuild_is_deterministic() {
        let state = LayoutState {
            params: PanelParams {
                mill_fillets: 0.0,
                ..PanelParams::default()
            },
            boards: vec![
                rect_board(1, 40.0, 30.0, 10.0, 6.6),
                rect_board(2, 40.0, 30.0, 51.6, 6.6),
                rect_board(3, 40.0, 30.0, 10.0, 38.2),
            ],
            holes: Vec::new(),
        };
        let first = rebuild(&state).unwrap();
        let second = rebuild(&state).unwrap();
        assert_eq!(
            primitives::area(&first.substrate),
            primitives::area(&second.substrate)
        );
        assert_eq!(first.tabs.len(), second.tabs.len());
        assert_eq!(first.vcuts.len(), second.vcuts.len());
        assert_eq!(first.bites.len(), second.bites.len());
    }
}
