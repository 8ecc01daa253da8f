//! # PanelKit Layout
//!
//! The panelization engine: boards placed on a frame, joined by breakable
//! tabs, separated by V-cut grooves or mouse-bite perforations, milled
//! with a real tool radius.
//!
//! ## Core Components
//!
//! - **Board**: placed outline instances with rotation-aware bounds
//! - **Frame / Hole**: rail polygons and user cutout regions
//! - **Tab pipeline**: candidate generation, ray-grown tab solids, cut
//!   classification into V-cuts and mouse-bite rows
//! - **Alignment**: directional snapping driven by swept collisions
//! - **Conflicts**: overlap, touch and out-of-frame detection
//! - **Panel assembly**: one pure [`panel_builder::rebuild`] over an
//!   immutable [`panel_builder::LayoutState`]
//! - **Session**: the mutable command layer every editing front end talks
//!   to, plus the [`backend::BoardBackend`] seam for board file formats
//!
//! ## Architecture
//!
//! ```text
//! session (commands, focus, export)
//!   └── panel_builder (pure rebuild)
//!         ├── tab_candidates → tab_builder → cut_planner
//!         ├── frame / hole / board placement
//!         ├── alignment (snap operations)
//!         └── conflicts
//! backend (board file load / panel export)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use panelkit_layout::session::PanelSession;
//!
//! let mut session = PanelSession::new();
//! let board = session.add_board(Path::new("led-driver.board.json"))?;
//! session.duplicate(board)?;
//! session.snap_top(None)?;
//! session.export(Some(Path::new("led-driver-panel")))?;
//! ```

pub mod alignment;
pub mod backend;
pub mod board;
pub mod conflicts;
pub mod cut_planner;
pub mod error;
pub mod frame;
pub mod hole;
pub mod panel_builder;
pub mod params;
pub mod session;
pub mod tab_builder;
pub mod tab_candidates;

pub use backend::{BoardBackend, ExportJob, ExportOptions, OutlineFileBackend, BOARD_SUFFIX};
pub use board::{AnchorDirection, BoardId, PlacedBoard, TabAnchor};
pub use error::{LayoutError, Result};
pub use hole::Hole;
pub use panel_builder::{rebuild, LayoutState, PanelResult};
pub use params::{CutMethod, PanelParams, VCutLayer};
pub use session::PanelSession;
