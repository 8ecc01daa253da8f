//! Placed boards.
//!
//! A board's outline is loaded once, in its own unrotated frame with the
//! bounding-box corner at the origin. Placement is a clockwise rotation
//! about that origin followed by a translation, so the stored outline never
//! changes. The axis-aligned bounds snap to the quarter-turn nearest the
//! stored rotation, which keeps edge alignment and stacking stable while a
//! board carries a small skew.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use panelkit_geometry::primitives::{place, place_direction, place_point};
use panelkit_geometry::{Bounds, MultiPolygon, Point, Polygon};

/// Stable board identity, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId(pub u64);

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "board#{}", self.0)
    }
}

/// Cardinal direction of a manually anchored tab, in the y-down frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorDirection {
    Up,
    Down,
    Left,
    Right,
}

impl AnchorDirection {
    /// Outward unit vector before board rotation.
    pub fn vector(&self) -> (f64, f64) {
        match self {
            AnchorDirection::Up => (0.0, -1.0),
            AnchorDirection::Down => (0.0, 1.0),
            AnchorDirection::Left => (-1.0, 0.0),
            AnchorDirection::Right => (1.0, 0.0),
        }
    }
}

/// A user-placed tab request: a point on the board in local coordinates
/// plus the outward growth direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabAnchor {
    pub x: f64,
    pub y: f64,
    pub direction: AnchorDirection,
}

/// A board instance inside the panel.
#[derive(Debug, Clone)]
pub struct PlacedBoard {
    id: BoardId,
    source_path: PathBuf,
    outline: Vec<Polygon>,
    width: f64,
    height: f64,
    /// Panel-frame offset of the board's local origin.
    pub x: f64,
    pub y: f64,
    /// Clockwise placement rotation; quarter turns keep bounds exact,
    /// arbitrary values are allowed.
    pub rotation_degrees: f64,
    /// Suppress automatic tab generation for this board.
    pub disable_auto_tab: bool,
    /// Manually requested tabs; a non-empty list also suppresses the
    /// automatic candidates.
    pub manual_tab_anchors: Vec<TabAnchor>,
}

impl PlacedBoard {
    /// Wrap a loaded outline. The outline polygons must be normalized so
    /// their joint bounding box starts at (0, 0).
    pub fn new(id: BoardId, source_path: &Path, outline: Vec<Polygon>) -> Self {
        let joint = MultiPolygon::new(outline.clone());
        let bounds = panelkit_geometry::primitives::bounds_of(&joint)
            .map(|b| b.normalized())
            .unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0));
        Self {
            id,
            source_path: source_path.to_path_buf(),
            outline,
            width: bounds.x2 - bounds.x1,
            height: bounds.y2 - bounds.y1,
            x: 0.0,
            y: 0.0,
            rotation_degrees: 0.0,
            disable_auto_tab: false,
            manual_tab_anchors: Vec::new(),
        }
    }

    /// Copy of this board under a new id, keeping rotation and tab
    /// configuration. The position resets; the caller re-places the copy.
    pub fn duplicate(&self, id: BoardId) -> Self {
        Self {
            id,
            source_path: self.source_path.clone(),
            outline: self.outline.clone(),
            width: self.width,
            height: self.height,
            x: 0.0,
            y: 0.0,
            rotation_degrees: self.rotation_degrees,
            disable_auto_tab: self.disable_auto_tab,
            manual_tab_anchors: self.manual_tab_anchors.clone(),
        }
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Short display name: parent folder and file stem.
    pub fn ident(&self) -> String {
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match self.source_path.parent().and_then(|p| p.file_name()) {
            Some(folder) => format!("{}/{}", folder.to_string_lossy(), stem),
            None => stem,
        }
    }

    /// Unrotated outline extents.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Outline polygons in the local frame.
    pub fn outline(&self) -> &[Polygon] {
        &self.outline
    }

    /// Outline placed into the panel frame.
    pub fn global_shapes(&self) -> MultiPolygon {
        MultiPolygon::new(
            self.outline
                .iter()
                .map(|poly| place(poly, self.rotation_degrees, self.x, self.y))
                .collect(),
        )
    }

    /// A local point placed into the panel frame.
    pub fn global_point(&self, local: Point) -> Point {
        place_point(local, self.rotation_degrees, self.x, self.y)
    }

    /// A local direction rotated into the panel frame.
    pub fn global_direction(&self, local: (f64, f64)) -> (f64, f64) {
        place_direction(local, self.rotation_degrees)
    }

    /// Quarter turn nearest the stored rotation.
    fn quadrant(&self) -> i64 {
        ((self.rotation_degrees / 90.0).round() as i64).rem_euclid(4)
    }

    /// Bounding box with raw (possibly inverted) edges, snapped to the
    /// nearest quarter turn.
    pub fn bbox(&self) -> Bounds {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        match self.quadrant() {
            0 => Bounds::new(x, y, x + w, y + h),
            1 => Bounds::new(x, y, x + h, y - w),
            2 => Bounds::new(x, y, x - w, y - h),
            _ => Bounds::new(x, y, x - h, y + w),
        }
    }

    /// Normalized bounding box.
    pub fn nbbox(&self) -> Bounds {
        self.bbox().normalized()
    }

    /// Extents as seen in the panel frame.
    pub fn rwidth(&self) -> f64 {
        match self.quadrant() {
            0 | 2 => self.width,
            _ => self.height,
        }
    }

    pub fn rheight(&self) -> f64 {
        match self.quadrant() {
            0 | 2 => self.height,
            _ => self.width,
        }
    }

    pub fn center(&self) -> Point {
        self.nbbox().center()
    }

    /// Move so the top edge of the normalized bounds lands on `top`.
    pub fn set_top(&mut self, top: f64) {
        self.y = match self.quadrant() {
            0 => top,
            1 => top + self.width,
            2 => top + self.height,
            _ => top,
        };
    }

    pub fn set_bottom(&mut self, bottom: f64) {
        self.y = match self.quadrant() {
            0 => bottom - self.height,
            1 => bottom,
            2 => bottom,
            _ => bottom - self.width,
        };
    }

    pub fn set_left(&mut self, left: f64) {
        self.x = match self.quadrant() {
            0 => left,
            1 => left,
            2 => left + self.width,
            _ => left + self.height,
        };
    }

    pub fn set_right(&mut self, right: f64) {
        self.x = match self.quadrant() {
            0 => right - self.width,
            1 => right - self.height,
            2 => right,
            _ => right,
        };
    }

    pub fn set_center(&mut self, c: Point) {
        self.set_left(c.x() - self.rwidth() / 2.0);
        self.set_top(c.y() - self.rheight() / 2.0);
    }

    /// Quarter turn counter-clockwise on screen, keeping the center.
    pub fn rotate_ccw(&mut self) {
        let c = self.center();
        self.rotation_degrees += 90.0;
        self.set_center(c);
    }

    /// Quarter turn clockwise on screen, keeping the center.
    pub fn rotate_cw(&mut self) {
        let c = self.center();
        self.rotation_degrees -= 90.0;
        self.set_center(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelkit_geometry::primitives::rect_polygon;

    fn board(w: f64, h: f64) -> PlacedBoard {
        PlacedBoard::new(
            BoardId(1),
            Path::new("boards/demo.board.json"),
            vec![rect_polygon(0.0, 0.0, w, h)],
        )
    }

    #[test]
    fn bbox_tracks_quarter_turns() {
        let mut b = board(10.0, 4.0);
        b.x = 2.0;
        b.y = 3.0;

        assert_eq!(b.bbox(), Bounds::new(2.0, 3.0, 12.0, 7.0));

        b.rotation_degrees = 90.0;
        assert_eq!(b.bbox(), Bounds::new(2.0, 3.0, 6.0, -7.0));
        assert_eq!(b.nbbox(), Bounds::new(2.0, -7.0, 6.0, 3.0));
        assert_eq!(b.rwidth(), 4.0);
        assert_eq!(b.rheight(), 10.0);

        b.rotation_degrees = 180.0;
        assert_eq!(b.bbox(), Bounds::new(2.0, 3.0, -8.0, -1.0));

        b.rotation_degrees = 270.0;
        assert_eq!(b.bbox(), Bounds::new(2.0, 3.0, -2.0, 13.0));

        b.rotation_degrees = -90.0;
        assert_eq!(b.quadrant(), 3);
    }

    #[test]
    fn edge_setters_land_on_the_requested_coordinate() {
        for rotation in [0.0, 90.0, 180.0, 270.0] {
            let mut b = board(10.0, 4.0);
            b.rotation_degrees = rotation;

            b.set_top(5.0);
            assert_eq!(b.nbbox().y1, 5.0, "top at rotation {rotation}");
            b.set_bottom(40.0);
            assert_eq!(b.nbbox().y2, 40.0, "bottom at rotation {rotation}");
            b.set_left(3.0);
            assert_eq!(b.nbbox().x1, 3.0, "left at rotation {rotation}");
            b.set_right(60.0);
            assert_eq!(b.nbbox().x2, 60.0, "right at rotation {rotation}");
        }
    }

    #[test]
    fn rotation_steps_preserve_the_center() {
        let mut b = board(10.0, 4.0);
        b.x = 7.0;
        b.y = 9.0;
        let before = b.center();

        b.rotate_ccw();
        assert_eq!(b.rotation_degrees, 90.0);
        let after = b.center();
        assert!((before.x() - after.x()).abs() < 1e-9);
        assert!((before.y() - after.y()).abs() < 1e-9);

        b.rotate_cw();
        assert_eq!(b.rotation_degrees, 0.0);
        assert_eq!(b.x, 7.0);
        assert_eq!(b.y, 9.0);
    }

    #[test]
    fn global_shapes_follow_placement() {
        let mut b = board(10.0, 4.0);
        b.x = 20.0;
        b.y = 30.0;
        b.rotation_degrees = 90.0;

        let shapes = b.global_shapes();
        let bounds = panelkit_geometry::primitives::bounds_of(&shapes)
            .unwrap()
            .normalized();
        assert!((bounds.x1 - 20.0).abs() < 1e-9);
        assert!((bounds.y1 - 20.0).abs() < 1e-9);
        assert!((bounds.x2 - 24.0).abs() < 1e-9);
        assert!((bounds.y2 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_keeps_tab_config_and_resets_position() {
        let mut b = board(10.0, 4.0);
        b.x = 5.0;
        b.y = 6.0;
        b.rotation_degrees = 90.0;
        b.disable_auto_tab = true;
        b.manual_tab_anchors.push(TabAnchor {
            x: 5.0,
            y: 0.0,
            direction: AnchorDirection::Up,
        });

        let copy = b.duplicate(BoardId(2));
        assert_eq!(copy.id(), BoardId(2));
        assert_eq!(copy.rotation_degrees, 90.0);
        assert!(copy.disable_auto_tab);
        assert_eq!(copy.manual_tab_anchors.len(), 1);
        assert_eq!(copy.x, 0.0);
        assert_eq!(copy.y, 0.0);
    }
}
