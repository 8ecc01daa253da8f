//! # PanelKit
//!
//! Batch small boards into one manufacturable panel: place outlines on a
//! frame, join them with breakable tabs, and plan the V-cut grooves and
//! mouse-bite perforations that separate them again.
//!
//! ## Architecture
//!
//! PanelKit is organized as a workspace with multiple crates:
//!
//! 1. **panelkit-geometry** - Polygon algebra, offsets, ray casting, swept collision
//! 2. **panelkit-layout** - Boards, frame, auto-tabs, cut planning, conflicts, session
//! 3. **panelkit-project** - Persisted layout records (save/load/replay)
//! 4. **panelkit** - Command line front end over the session
//!
//! ## Features
//!
//! - **Automatic tabs**: spacing-driven candidates on every open board edge
//! - **Cut planning**: V-cut grooves on clear lanes, mouse bites elsewhere
//! - **Tight panels**: shrink-wrapped bodies instead of full frame fills
//! - **Mill simulation**: inside corners rounded at the real cutter radius
//! - **Snapping**: directional alignment driven by swept collisions
//! - **Records**: flat JSON project files with record-relative board paths

use std::path::Path;

use anyhow::{bail, Context};

use panelkit_layout::conflicts::ConflictKind;
use panelkit_project::serialization;

pub use panelkit_geometry::{Bounds, GeometryError};
pub use panelkit_layout::{
    AnchorDirection, BoardBackend, BoardId, CutMethod, ExportOptions, Hole, LayoutError,
    OutlineFileBackend, PanelParams, PanelResult, PanelSession, PlacedBoard, TabAnchor, VCutLayer,
    BOARD_SUFFIX,
};
pub use panelkit_project::{BoardEntry, LayoutRecord, RECORD_SUFFIX};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, keeping stdout for the layout summary
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Command line entry point.
///
/// `panelkit <record.panel.json> [export-target]` replays a saved record;
/// with a target it runs a non-interactive export and exits. Any other
/// arguments are board files seeding a fresh layout. Without an export the
/// layout is built once and summarized on stdout.
pub fn run(args: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
    let args: Vec<String> = args.into_iter().collect();
    if args.first().map(String::as_str) == Some("--version") {
        println!("panelkit {VERSION} ({BUILD_DATE})");
        return Ok(());
    }
    if args.is_empty() {
        bail!("usage: panelkit <record{RECORD_SUFFIX}> [export-target] | panelkit <board{BOARD_SUFFIX}>...");
    }

    let mut session = PanelSession::new();
    if args[0].ends_with(RECORD_SUFFIX) {
        let record_path = Path::new(&args[0]);
        let record = serialization::load(record_path)?;
        serialization::apply(&record, record_path, &mut session)?;
        if let Some(target) = args.get(1) {
            let written = session.export(Some(Path::new(target)))?;
            println!("exported {}", written.display());
            return Ok(());
        }
    } else {
        for arg in &args {
            session
                .add_board(Path::new(arg))
                .with_context(|| format!("attaching board {arg}"))?;
        }
    }

    print_summary(&session);
    Ok(())
}

fn print_summary(session: &PanelSession) {
    let panel = session.panel();
    println!("boards:          {}", session.boards().len());
    println!("tabs:            {}", panel.tabs.len());
    println!("v-cuts:          {}", panel.vcuts.len());
    println!("mouse-bite rows: {}", panel.bites.len());
    println!("conflicts:       {}", panel.conflicts.len());
    for conflict in &panel.conflicts {
        let kind = match &conflict.kind {
            ConflictKind::Overlap(_) => "overlap",
            ConflictKind::Touching(_) => "touching",
            ConflictKind::OutOfFrame(_) => "out of frame",
        };
        println!("  {kind}: {} with {}", conflict.first, conflict.second);
    }
}
