//! Board file access.
//!
//! The layout engine never parses or writes board files itself; a
//! [`BoardBackend`] does both. The shipped [`OutlineFileBackend`] speaks a
//! plain JSON outline format. An exported panel document is itself a valid
//! outline file, so a finished panel can be loaded back as one big board.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use panelkit_geometry::{primitives, LineString, MultiPolygon, Point, Polygon};

use crate::board::PlacedBoard;
use crate::error::{LayoutError, Result};
use crate::panel_builder::PanelResult;
use crate::params::VCutLayer;

/// Suffix of board outline files. Enforced on export targets.
pub const BOARD_SUFFIX: &str = ".board.json";

/// Translation applied to all exported geometry, in millimetres on both
/// axes.
pub const EXPORT_ORIGIN: f64 = 20.0;

/// Export tuning accepted by every backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Drop text annotations that fall outside every board outline, where
    /// the target format carries text at all.
    #[serde(default)]
    pub hide_stray_text: bool,
}

/// A complete export request.
#[derive(Debug)]
pub struct ExportJob<'a> {
    pub path: &'a Path,
    pub boards: &'a [PlacedBoard],
    pub panel: &'a PanelResult,
    pub vc_layer: VCutLayer,
    pub options: ExportOptions,
}

/// Loads board outlines and writes finished panels.
pub trait BoardBackend {
    /// Read the outline polygons of a board file, in millimetres,
    /// normalized so their joint bounding box starts at (0, 0).
    fn load_outline(&self, path: &Path) -> Result<Vec<Polygon>>;

    /// Write the finished panel.
    fn export_panel(&self, job: &ExportJob) -> Result<()>;
}

/// Append the board suffix when missing.
pub fn with_board_suffix(target: &str) -> PathBuf {
    if target.ends_with(BOARD_SUFFIX) {
        PathBuf::from(target)
    } else {
        PathBuf::from(format!("{target}{BOARD_SUFFIX}"))
    }
}

/// Backend for `.board.json` outline files.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineFileBackend;

/// One outline polygon as stored on disk: an exterior ring and optional
/// cutout rings, open form (no repeated closing vertex).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RingSet {
    exterior: Vec<(f64, f64)>,
    #[serde(default)]
    holes: Vec<Vec<(f64, f64)>>,
}

impl RingSet {
    fn to_polygon(&self, path: &Path) -> Result<Polygon> {
        let fail = |reason: String| LayoutError::LoadFailure {
            path: path.display().to_string(),
            reason,
        };
        let outer = primitives::polygon_from_points(&self.exterior)
            .map_err(|e| fail(e.to_string()))?;
        let mut interiors = Vec::with_capacity(self.holes.len());
        for ring in &self.holes {
            let hole = primitives::polygon_from_points(ring).map_err(|e| fail(e.to_string()))?;
            interiors.push(hole.exterior().clone());
        }
        Ok(Polygon::new(outer.exterior().clone(), interiors))
    }

    fn from_polygon(polygon: &Polygon) -> Self {
        Self {
            exterior: open_ring(polygon.exterior()),
            holes: polygon.interiors().iter().map(open_ring).collect(),
        }
    }
}

/// Ring coordinates without the repeated closing vertex.
fn open_ring(ring: &LineString) -> Vec<(f64, f64)> {
    let coords = &ring.0;
    coords
        .iter()
        .take(coords.len().saturating_sub(1))
        .map(|c| (c.x, c.y))
        .collect()
}

#[derive(Debug, Serialize, Deserialize)]
struct OutlineDoc {
    #[serde(default)]
    outlines: Vec<RingSet>,
}

/// The exported panel document. The `outlines` field makes it loadable as
/// a plain board file; the remaining fields carry the fabrication extras.
#[derive(Debug, Serialize)]
struct PanelDoc {
    outlines: Vec<RingSet>,
    boards: Vec<BoardPlacement>,
    vc_layer: String,
    vcuts: Vec<Vec<(f64, f64)>>,
    mousebites: Vec<BiteEntry>,
    options: ExportOptions,
}

#[derive(Debug, Serialize)]
struct BoardPlacement {
    file: String,
    x: f64,
    y: f64,
    rotate: f64,
}

#[derive(Debug, Serialize)]
struct BiteEntry {
    diameter: f64,
    centers: Vec<(f64, f64)>,
}

impl BoardBackend for OutlineFileBackend {
    fn load_outline(&self, path: &Path) -> Result<Vec<Polygon>> {
        let fail = |reason: String| LayoutError::LoadFailure {
            path: path.display().to_string(),
            reason,
        };
        let raw = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let doc: OutlineDoc = serde_json::from_str(&raw).map_err(|e| fail(e.to_string()))?;
        if doc.outlines.is_empty() {
            return Err(fail("no outline polygons".to_string()));
        }

        let mut polygons = Vec::with_capacity(doc.outlines.len());
        for set in &doc.outlines {
            polygons.push(set.to_polygon(path)?);
        }

        let joint = MultiPolygon::new(polygons.clone());
        let bounds = primitives::bounds_of(&joint)
            .ok_or_else(|| fail("empty outline".to_string()))?
            .normalized();
        let normalized = polygons
            .iter()
            .map(|p| primitives::place(p, 0.0, -bounds.x1, -bounds.y1))
            .collect();
        Ok(normalized)
    }

    fn export_panel(&self, job: &ExportJob) -> Result<()> {
        let fail = |reason: String| LayoutError::WriteFailure {
            path: job.path.display().to_string(),
            reason,
        };

        let outlines = job
            .panel
            .substrate
            .0
            .iter()
            .map(|piece| {
                let shifted = primitives::place(piece, 0.0, EXPORT_ORIGIN, EXPORT_ORIGIN);
                RingSet::from_polygon(&shifted)
            })
            .collect();
        let boards = job
            .boards
            .iter()
            .map(|b| BoardPlacement {
                file: b.source_path().display().to_string(),
                x: b.x + EXPORT_ORIGIN,
                y: b.y + EXPORT_ORIGIN,
                rotate: b.rotation_degrees,
            })
            .collect();
        let vcuts = job
            .panel
            .vcuts
            .iter()
            .map(|v| shifted_line(&v.line))
            .collect();
        let mousebites = job
            .panel
            .bites
            .iter()
            .map(|row| BiteEntry {
                diameter: row.diameter,
                centers: row
                    .centers
                    .iter()
                    .map(|p| (p.x() + EXPORT_ORIGIN, p.y() + EXPORT_ORIGIN))
                    .collect(),
            })
            .collect();

        let doc = PanelDoc {
            outlines,
            boards,
            vc_layer: job.vc_layer.as_str().to_string(),
            vcuts,
            mousebites,
            options: job.options,
        };
        let text = serde_json::to_string_pretty(&doc).map_err(|e| fail(e.to_string()))?;
        fs::write(job.path, text).map_err(|e| fail(e.to_string()))?;

        info!(
            path = %job.path.display(),
            boards = job.boards.len(),
            vcuts = job.panel.vcuts.len(),
            bites = job.panel.bites.len(),
            "panel exported"
        );
        Ok(())
    }
}

fn shifted_line(line: &LineString) -> Vec<(f64, f64)> {
    line.0
        .iter()
        .map(|c| (c.x + EXPORT_ORIGIN, c.y + EXPORT_ORIGIN))
        .collect()
}
