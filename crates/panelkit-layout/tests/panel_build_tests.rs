//! Whole-pipeline rebuild scenarios: candidate walks, bridge growth, cut
//! classification and determinism, exercised through the public API.

use std::path::Path;

use panelkit_geometry::primitives;
use panelkit_layout::board::{BoardId, PlacedBoard};
use panelkit_layout::panel_builder::{rebuild, LayoutState};
use panelkit_layout::params::PanelParams;

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

fn frameless(boards: Vec<PlacedBoard>) -> LayoutState {
    LayoutState {
        params: PanelParams {
            use_frame: false,
            tight: false,
            mill_fillets: 0.0,
            ..PanelParams::default()
        },
        boards,
        holes: Vec::new(),
    }
}

fn sorted_groove_levels(panel: &panelkit_layout::PanelResult) -> Vec<f64> {
    let mut levels: Vec<f64> = panel
        .vcuts
        .iter()
        .filter_map(|v| v.line.0.first().map(|c| c.y))
        .collect();
    levels.sort_by(f64::total_cmp);
    levels
}

#[test]
fn a_lone_frameless_board_grows_nothing() {
    let panel = rebuild(&frameless(vec![rect_board(1, 40.0, 30.0, 0.0, 0.0)])).unwrap();

    assert!(panel.tabs.is_empty());
    assert!(panel.markers.is_empty());
    assert!(panel.vcuts.is_empty());
    assert!(panel.bites.is_empty());
    assert!((primitives::area(&panel.substrate) - 1200.0).abs() < 1e-9);
}

#[test]
fn a_column_of_boards_bridges_every_gap_once() {
    let state = frameless(vec![
        rect_board(1, 40.0, 30.0, 0.0, 0.0),
        rect_board(2, 40.0, 30.0, 0.0, 31.6),
        rect_board(3, 40.0, 30.0, 0.0, 63.2),
    ]);
    let panel = rebuild(&state).unwrap();

    // Two seams, one accepted spot each, a pair of tabs per seam.
    assert_eq!(panel.markers.len(), 2);
    assert_eq!(panel.tabs.len(), 4);
    assert!(panel.bites.is_empty());

    // Every face rests on a bounding edge, so all four cuts score.
    assert_eq!(
        sorted_groove_levels(&panel),
        vec![30.0, 31.6, 61.6, 63.2]
    );

    let area = primitives::area(&panel.substrate);
    let expected = 3.0 * 1200.0 + 2.0 * (3.6 * 1.6);
    assert!((area - expected).abs() < 1e-6, "area {area}");
}

#[test]
fn board_order_does_not_change_the_cut_set() {
    let a = rect_board(1, 40.0, 30.0, 0.0, 0.0);
    let b = rect_board(2, 40.0, 30.0, 0.0, 31.6);
    let c = rect_board(3, 40.0, 30.0, 0.0, 63.2);

    let forward = rebuild(&frameless(vec![a.clone(), b.clone(), c.clone()])).unwrap();
    let shuffled = rebuild(&frameless(vec![c, a, b])).unwrap();

    assert_eq!(forward.tabs.len(), shuffled.tabs.len());
    assert_eq!(sorted_groove_levels(&forward), sorted_groove_levels(&shuffled));
    let area_forward = primitives::area(&forward.substrate);
    let area_shuffled = primitives::area(&shuffled.substrate);
    assert!((area_forward - area_shuffled).abs() < 1e-6);
}

#[test]
fn wide_gaps_are_bridged_from_both_rims() {
    // Two 40x30 boards side by side, a 60-wide board 10 below them. The
    // narrow seam de-duplicates to one pair; the wide gap is outside the
    // half-spacing offset of either rim, so each side grows its own pair.
    let state = frameless(vec![
        rect_board(1, 40.0, 30.0, 0.0, 0.0),
        rect_board(2, 40.0, 30.0, 41.6, 0.0),
        rect_board(3, 60.0, 30.0, 10.0, 40.0),
    ]);
    let panel = rebuild(&state).unwrap();

    assert_eq!(panel.markers.len(), 5);
    assert_eq!(panel.tabs.len(), 10);

    // The seam faces at x = 40 and x = 41.6 run through the wide board's
    // x span, so they perforate; the horizontal faces all lie on bounding
    // edges and score.
    assert_eq!(panel.bites.len(), 2);
    assert_eq!(panel.vcuts.len(), 8);
    for row in &panel.bites {
        // A 3.6 mm face at the derived 0.9 mm pitch carries five bites.
        assert_eq!(row.centers.len(), 5);
        assert_eq!(row.diameter, 0.6);
    }
    let levels = sorted_groove_levels(&panel);
    assert!(levels[..4].iter().all(|y| (*y - 30.0).abs() < 1e-9));
    assert!(levels[4..].iter().all(|y| (*y - 40.0).abs() < 1e-9));

    let area = primitives::area(&panel.substrate);
    let expected = 4200.0 + 2.0 * (0.8 * 3.6) + 4.0 * (9.2 * 3.6 + 0.8 * 3.6);
    assert!((area - expected).abs() < 1e-6, "area {area}");
}

#[test]
fn default_settings_bridge_a_lone_board_to_the_fill() {
    // Tight fill plus frame: the board floats in its spacing moat and a
    // bridge grows on each side. Only the faces on the board outline
    // become cuts; the moat-side faces stay silent.
    let state = LayoutState {
        params: PanelParams::default(),
        boards: vec![rect_board(1, 40.0, 30.0, 30.0, 35.0)],
        holes: Vec::new(),
    };
    let panel = rebuild(&state).unwrap();

    assert_eq!(panel.markers.len(), 4);
    assert_eq!(panel.tabs.len(), 8);
    assert_eq!(panel.vcuts.len(), 4);
    assert!(panel.bites.is_empty());
    assert!(panel.conflicts.is_empty());
}

#[test]
fn rebuild_of_the_same_state_is_identical() {
    let state = LayoutState {
        params: PanelParams::default(),
        boards: vec![
            rect_board(1, 40.0, 30.0, 10.0, 6.6),
            rect_board(2, 40.0, 30.0, 51.6, 6.6),
        ],
        holes: Vec::new(),
    };

    let first = rebuild(&state).unwrap();
    let second = rebuild(&state).unwrap();

    assert_eq!(first.tabs.len(), second.tabs.len());
    assert_eq!(first.vcuts.len(), second.vcuts.len());
    assert_eq!(first.bites.len(), second.bites.len());
    assert_eq!(
        primitives::area(&first.substrate),
        primitives::area(&second.substrate)
    );
}
