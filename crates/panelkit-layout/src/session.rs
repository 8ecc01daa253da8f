//! Interactive panel session.
//!
//! [`PanelSession`] owns the layout state, the last good build and the
//! board backend. Every edit runs one full rebuild; when a rebuild fails
//! the previous result stays current and the error is returned, so callers
//! never observe a half-built panel.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::alignment;
use crate::backend::{with_board_suffix, BoardBackend, ExportJob, ExportOptions, OutlineFileBackend};
use crate::board::{AnchorDirection, BoardId, PlacedBoard, TabAnchor};
use crate::error::{LayoutError, Result};
use crate::hole::Hole;
use crate::panel_builder::{self, LayoutState, PanelResult};
use crate::params::PanelParams;

pub struct PanelSession {
    state: LayoutState,
    panel: PanelResult,
    focus: Option<BoardId>,
    export_path: Option<PathBuf>,
    export_options: ExportOptions,
    backend: Box<dyn BoardBackend>,
    next_id: u64,
}

impl PanelSession {
    /// Fresh session over the shipped outline-file backend.
    pub fn new() -> Self {
        Self::with_backend(Box::new(OutlineFileBackend))
    }

    pub fn with_backend(backend: Box<dyn BoardBackend>) -> Self {
        Self {
            state: LayoutState::default(),
            panel: PanelResult::empty(),
            focus: None,
            export_path: None,
            export_options: ExportOptions::default(),
            backend,
            next_id: 1,
        }
    }

    pub fn params(&self) -> &PanelParams {
        &self.state.params
    }

    pub fn boards(&self) -> &[PlacedBoard] {
        &self.state.boards
    }

    pub fn holes(&self) -> &[Hole] {
        &self.state.holes
    }

    /// The last successful build.
    pub fn panel(&self) -> &PanelResult {
        &self.panel
    }

    pub fn focus(&self) -> Option<BoardId> {
        self.focus
    }

    pub fn export_path(&self) -> Option<&Path> {
        self.export_path.as_deref()
    }

    fn board_index(&self, id: BoardId) -> Result<usize> {
        self.state
            .boards
            .iter()
            .position(|b| b.id() == id)
            .ok_or(LayoutError::UnknownBoard(id.0))
    }

    fn board_mut(&mut self, id: BoardId) -> Result<&mut PlacedBoard> {
        let idx = self.board_index(id)?;
        Ok(&mut self.state.boards[idx])
    }

    /// Stacking spot for a newly attached board: directly below the last
    /// one, or at the frame top standoff when the list is empty.
    fn stack_position(&self) -> (f64, f64) {
        let params = &self.state.params;
        match self.state.boards.last() {
            Some(prev) => (0.0, prev.y + prev.rheight() + params.spacing),
            None if params.frame_top > 0.0 => (0.0, params.frame_top + params.spacing),
            None => (0.0, 0.0),
        }
    }

    fn take_id(&mut self) -> BoardId {
        let id = BoardId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Attach a board file. A load failure leaves the session unchanged.
    pub fn add_board(&mut self, path: &Path) -> Result<BoardId> {
        let outline = self.backend.load_outline(path).inspect_err(|err| {
            error!(path = %path.display(), "board load failed: {err}");
        })?;
        let id = self.take_id();
        let mut board = PlacedBoard::new(id, path, outline);
        (board.x, board.y) = self.stack_position();
        info!(board = %id, path = %path.display(), "board attached");
        self.state.boards.push(board);
        self.rebuild()?;
        Ok(id)
    }

    /// Clone a board under a new id, stacked below the current column.
    pub fn duplicate(&mut self, id: BoardId) -> Result<BoardId> {
        let idx = self.board_index(id)?;
        let copy_id = self.take_id();
        let mut copy = self.state.boards[idx].duplicate(copy_id);
        (copy.x, copy.y) = self.stack_position();
        self.state.boards.push(copy);
        self.rebuild()?;
        Ok(copy_id)
    }

    /// Detach a board, dropping the focus when it pointed there.
    pub fn remove(&mut self, id: BoardId) -> Result<()> {
        let idx = self.board_index(id)?;
        self.state.boards.remove(idx);
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.rebuild()
    }

    pub fn move_board(&mut self, id: BoardId, dx: f64, dy: f64) -> Result<()> {
        let board = self.board_mut(id)?;
        board.x += dx;
        board.y += dy;
        self.rebuild()
    }

    pub fn set_position(&mut self, id: BoardId, x: f64, y: f64) -> Result<()> {
        let board = self.board_mut(id)?;
        board.x = x;
        board.y = y;
        self.rebuild()
    }

    pub fn rotate_ccw(&mut self, id: BoardId) -> Result<()> {
        self.board_mut(id)?.rotate_ccw();
        self.rebuild()
    }

    pub fn rotate_cw(&mut self, id: BoardId) -> Result<()> {
        self.board_mut(id)?.rotate_cw();
        self.rebuild()
    }

    pub fn set_rotation(&mut self, id: BoardId, degrees: f64) -> Result<()> {
        self.board_mut(id)?.rotation_degrees = degrees;
        self.rebuild()
    }

    pub fn set_auto_tab(&mut self, id: BoardId, enabled: bool) -> Result<()> {
        self.board_mut(id)?.disable_auto_tab = !enabled;
        self.rebuild()
    }

    pub fn set_focus(&mut self, focus: Option<BoardId>) -> Result<()> {
        if let Some(id) = focus {
            self.board_index(id)?;
        }
        self.focus = focus;
        Ok(())
    }

    /// Close a drawn polyline into a frame hole.
    pub fn add_hole(&mut self, points: &[(f64, f64)]) -> Result<()> {
        let hole = Hole::from_points(points)?;
        self.state.holes.push(hole);
        self.rebuild()
    }

    /// Drop a hole by index. Out-of-range indexes are ignored.
    pub fn remove_hole(&mut self, index: usize) -> Result<()> {
        if index < self.state.holes.len() {
            self.state.holes.remove(index);
        }
        self.rebuild()
    }

    /// Request a tab at a board-local point, grown in the given direction.
    pub fn add_tab_anchor(
        &mut self,
        id: BoardId,
        x: f64,
        y: f64,
        direction: AnchorDirection,
    ) -> Result<()> {
        self.board_mut(id)?
            .manual_tab_anchors
            .push(TabAnchor { x, y, direction });
        self.rebuild()
    }

    pub fn clear_tab_anchors(&mut self, id: BoardId) -> Result<()> {
        self.board_mut(id)?.manual_tab_anchors.clear();
        self.rebuild()
    }

    pub fn set_params(&mut self, params: PanelParams) -> Result<()> {
        self.state.params = params;
        self.rebuild()
    }

    pub fn set_export_path(&mut self, path: Option<PathBuf>) {
        self.export_path = path;
    }

    pub fn set_export_options(&mut self, options: ExportOptions) {
        self.export_options = options;
    }

    pub fn snap_top(&mut self, only: Option<BoardId>) -> Result<()> {
        let state = &mut self.state;
        alignment::snap_top(&mut state.boards, &state.params, only);
        self.rebuild()
    }

    pub fn snap_bottom(&mut self, only: Option<BoardId>) -> Result<()> {
        let state = &mut self.state;
        alignment::snap_bottom(&mut state.boards, &state.params, only);
        self.rebuild()
    }

    pub fn snap_left(&mut self, only: Option<BoardId>) -> Result<()> {
        let state = &mut self.state;
        alignment::snap_left(&mut state.boards, &state.params, only);
        self.rebuild()
    }

    pub fn snap_right(&mut self, only: Option<BoardId>) -> Result<()> {
        let state = &mut self.state;
        alignment::snap_right(&mut state.boards, &state.params, only);
        self.rebuild()
    }

    /// Run a full rebuild. On failure the previous result stays current.
    pub fn rebuild(&mut self) -> Result<()> {
        self.panel = panel_builder::rebuild(&self.state)?;
        Ok(())
    }

    /// Export the panel. The target is the argument when given, else the
    /// stored path from a previous export or a loaded record. The board
    /// file suffix is enforced and the resolved target is stored back.
    pub fn export(&mut self, target: Option<&Path>) -> Result<PathBuf> {
        let path = match target {
            Some(p) => with_board_suffix(&p.to_string_lossy()),
            None => self
                .export_path
                .clone()
                .ok_or(LayoutError::ExportTargetUnset)?,
        };
        self.export_path = Some(path.clone());
        self.rebuild()?;

        let job = ExportJob {
            path: &path,
            boards: &self.state.boards,
            panel: &self.panel,
            vc_layer: self.state.params.vc_layer,
            options: self.export_options,
        };
        self.backend.export_panel(&job)?;
        Ok(path)
    }
}

impl Default for PanelSession {
    fn default() -> Self {
        Self::new()
    }
}
