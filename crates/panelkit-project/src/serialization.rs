//! Layout record save and load.
//!
//! A record is one flat JSON document: the global parameters at the top
//! level, the ordered board list under `pcb`, hole polygons under `holes`.
//! Every key is optional on load, so a record written before a knob
//! existed comes back with that knob at its default. Derived geometry is
//! never stored; loading replays the record through a session rebuild.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use panelkit_layout::{Hole, PanelParams, PanelSession, PlacedBoard, TabAnchor};

/// Suffix enforced on every record file.
pub const RECORD_SUFFIX: &str = ".panel.json";

/// One placed board as stored in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    /// Board file, relative to the record directory when it lives under
    /// it, untouched otherwise.
    pub file: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotate: f64,
    #[serde(default)]
    pub disable_auto_tab: bool,
    #[serde(default)]
    pub manual_tab_anchors: Vec<TabAnchor>,
}

/// A persisted panel layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRecord {
    #[serde(flatten)]
    pub params: PanelParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
    #[serde(default)]
    pub pcb: Vec<BoardEntry>,
    #[serde(default)]
    pub holes: Vec<Vec<(f64, f64)>>,
}

/// Append [`RECORD_SUFFIX`] unless the target already carries it.
pub fn with_record_suffix(target: &str) -> PathBuf {
    if target.ends_with(RECORD_SUFFIX) {
        PathBuf::from(target)
    } else {
        PathBuf::from(format!("{target}{RECORD_SUFFIX}"))
    }
}

/// Board path as stored in a record anchored at `record_dir`.
fn stored_board_path(board: &Path, record_dir: &Path) -> String {
    if record_dir.as_os_str().is_empty() {
        return board.display().to_string();
    }
    match board.strip_prefix(record_dir) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => board.display().to_string(),
    }
}

/// Stored board path resolved back to a loadable one.
pub fn resolve_board_path(record_path: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match record_path.parent() {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

/// Snapshot live layout state into a record anchored at `record_path`.
///
/// Hole polygons are written at their panel position, so the stored
/// vertex lists already include any hole offset.
pub fn capture(
    params: &PanelParams,
    boards: &[PlacedBoard],
    holes: &[Hole],
    export_path: Option<&Path>,
    record_path: &Path,
) -> LayoutRecord {
    let record_dir = record_path.parent().unwrap_or_else(|| Path::new(""));
    let pcb = boards
        .iter()
        .map(|board| BoardEntry {
            file: stored_board_path(board.source_path(), record_dir),
            x: board.x,
            y: board.y,
            rotate: board.rotation_degrees,
            disable_auto_tab: board.disable_auto_tab,
            manual_tab_anchors: board.manual_tab_anchors.clone(),
        })
        .collect();
    let holes = holes
        .iter()
        .map(|hole| {
            hole.points()
                .into_iter()
                .map(|(px, py)| (px + hole.x, py + hole.y))
                .collect()
        })
        .collect();
    LayoutRecord {
        params: params.clone(),
        export_path: export_path.map(|p| p.display().to_string()),
        pcb,
        holes,
    }
}

/// Write a record, appending [`RECORD_SUFFIX`] when absent. Returns the
/// path actually written.
pub fn save(record: &LayoutRecord, target: &Path) -> anyhow::Result<PathBuf> {
    let path = with_record_suffix(&target.to_string_lossy());
    let body = serde_json::to_string_pretty(record)
        .with_context(|| format!("encoding layout record {}", path.display()))?;
    fs::write(&path, body)
        .with_context(|| format!("writing layout record {}", path.display()))?;
    info!(path = %path.display(), boards = record.pcb.len(), "layout record saved");
    Ok(path)
}

/// Read a record back. Missing keys load as defaults.
pub fn load(path: &Path) -> anyhow::Result<LayoutRecord> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("reading layout record {}", path.display()))?;
    let record = serde_json::from_str(&body)
        .with_context(|| format!("parsing layout record {}", path.display()))?;
    Ok(record)
}

/// Rehydrate a session from a loaded record.
///
/// Parameters land first so every later placement rebuilds against the
/// recorded frame. A board that fails to load aborts the replay with the
/// offending path in the error chain; the session keeps what was applied
/// up to that point and stays usable.
pub fn apply(
    record: &LayoutRecord,
    record_path: &Path,
    session: &mut PanelSession,
) -> anyhow::Result<()> {
    session.set_params(record.params.clone())?;
    for entry in &record.pcb {
        let path = resolve_board_path(record_path, &entry.file);
        let id = session
            .add_board(&path)
            .with_context(|| format!("attaching board {}", path.display()))?;
        session.set_position(id, entry.x, entry.y)?;
        if entry.rotate != 0.0 {
            session.set_rotation(id, entry.rotate)?;
        }
        if entry.disable_auto_tab {
            session.set_auto_tab(id, false)?;
        }
        for anchor in &entry.manual_tab_anchors {
            session.add_tab_anchor(id, anchor.x, anchor.y, anchor.direction)?;
        }
    }
    for points in &record.holes {
        session.add_hole(points)?;
    }
    session.set_export_path(record.export_path.as_ref().map(PathBuf::from));
    info!(
        path = %record_path.display(),
        boards = record.pcb.len(),
        holes = record.holes.len(),
        "layout record applied"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelkit_geometry::primitives::rect_polygon;
    use panelkit_layout::BoardId;

    #[test]
    fn suffix_is_appended_once() {
        assert_eq!(
            with_record_suffix("batch"),
            PathBuf::from("batch.panel.json")
        );
        assert_eq!(
            with_record_suffix("batch.panel.json"),
            PathBuf::from("batch.panel.json")
        );
    }

    #[test]
    fn an_empty_record_parses_to_defaults() {
        let record: LayoutRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.params, PanelParams::default());
        assert!(record.export_path.is_none());
        assert!(record.pcb.is_empty());
        assert!(record.holes.is_empty());
    }

    #[test]
    fn parameters_stay_at_the_top_level() {
        let value = serde_json::to_value(LayoutRecord::default()).unwrap();
        assert_eq!(value["spacing"], serde_json::json!(1.6));
        assert_eq!(value["vc_layer"], serde_json::json!("Cmts.User"));
        assert!(value["pcb"].as_array().unwrap().is_empty());
        assert!(value.get("export_path").is_none());
    }

    #[test]
    fn board_paths_under_the_record_directory_go_relative() {
        let inside = PlacedBoard::new(
            BoardId(1),
            Path::new("/work/proj/boards/a.board.json"),
            vec![rect_polygon(0.0, 0.0, 40.0, 30.0)],
        );
        let outside = PlacedBoard::new(
            BoardId(2),
            Path::new("/elsewhere/b.board.json"),
            vec![rect_polygon(0.0, 0.0, 40.0, 30.0)],
        );
        let record = capture(
            &PanelParams::default(),
            &[inside, outside],
            &[],
            None,
            Path::new("/work/proj/batch.panel.json"),
        );
        assert_eq!(record.pcb[0].file, "boards/a.board.json");
        assert_eq!(record.pcb[1].file, "/elsewhere/b.board.json");
    }

    #[test]
    fn relative_entries_resolve_against_the_record_directory() {
        let resolved = resolve_board_path(
            Path::new("/work/proj/batch.panel.json"),
            "boards/a.board.json",
        );
        assert_eq!(resolved, PathBuf::from("/work/proj/boards/a.board.json"));

        let absolute = resolve_board_path(
            Path::new("/work/proj/batch.panel.json"),
            "/elsewhere/b.board.json",
        );
        assert_eq!(absolute, PathBuf::from("/elsewhere/b.board.json"));
    }

    #[test]
    fn holes_are_stored_at_their_panel_position() {
        let mut hole =
            Hole::from_points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
        hole.x = 10.0;
        hole.y = 20.0;
        let record = capture(
            &PanelParams::default(),
            &[],
            &[hole],
            None,
            Path::new("batch.panel.json"),
        );
        assert_eq!(
            record.holes[0],
            vec![(10.0, 20.0), (14.0, 20.0), (14.0, 24.0), (10.0, 24.0)]
        );
    }
}
