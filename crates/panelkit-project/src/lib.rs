//! # PanelKit Project
//!
//! Persisted panel-layout records: the flat JSON document a session is
//! saved to and replayed from. A record stores the global parameters, the
//! board list with per-board tab configuration and the hole polygons;
//! board paths go relative to the record directory whenever they live
//! under it, so a project directory moves as one unit.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use panelkit_layout::PanelSession;
//! use panelkit_project::serialization;
//!
//! let record = serialization::load(Path::new("batch.panel.json"))?;
//! let mut session = PanelSession::new();
//! serialization::apply(&record, Path::new("batch.panel.json"), &mut session)?;
//! ```

pub mod serialization;

pub use serialization::{
    apply, capture, load, resolve_board_path, save, with_record_suffix, BoardEntry, LayoutRecord,
    RECORD_SUFFIX,
};
