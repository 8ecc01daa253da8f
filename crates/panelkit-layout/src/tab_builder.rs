//! Tab construction against the current panel substrate.
//!
//! A tab grows from an anchor point into the substrate along a direction:
//! two rays offset by half the tab width find the entry points on a
//! boundary ring, the ring arc between them becomes the tab face, and the
//! face plus the two anchor-side corners becomes the solid. Every ring the
//! rays can reach proposes a piece; the piece nearest the anchor wins, so
//! an anchor sitting in a cutout attaches to the cutout's rim and not to
//! the far outer boundary behind it.

use geo::{BoundingRect, Coord};
use tracing::warn;

use panelkit_geometry::raycast::{boundary_arc, closest_hit, normalize};
use panelkit_geometry::{offset, primitives, GeometryError};
use panelkit_geometry::{LineString, MultiPolygon, Point, Polygon};

use crate::error::{LayoutError, Result};

/// Search depth for tab entry rays, in millimetres.
pub const TAB_REACH: f64 = 50.0;

/// A constructed breakaway tab.
#[derive(Debug, Clone)]
pub struct Tab {
    /// Material to merge into the panel body.
    pub solid: Polygon,
    /// Boundary arc where the tab meets the substrate; becomes a cut.
    pub face: LineString,
}

/// Grow a tab from `origin` along `direction` into `substrate`.
///
/// The origin must lie on or outside the substrate boundary. Returns the
/// nearest constructible tab; a ray miss on every ring is a recoverable
/// `NoIntersection` error.
pub fn build_tab(
    substrate: &MultiPolygon,
    origin: Point,
    direction: (f64, f64),
    width: f64,
    fillet_radius: f64,
) -> Result<Tab> {
    let miss = || {
        LayoutError::Geometry(GeometryError::NoIntersection {
            x: origin.x(),
            y: origin.y(),
            dx: direction.0,
            dy: direction.1,
        })
    };
    let Some(unit) = normalize(direction) else {
        return Err(miss());
    };
    let dir = (round4(unit.0), round4(unit.1));

    if primitives::contains_point(substrate, origin) {
        return Err(LayoutError::AnchorInsidePanel {
            x: origin.x(),
            y: origin.y(),
        });
    }

    let oriented = primitives::normalize_winding(substrate);
    let perp = (dir.1, -dir.0);
    let side_a = Point::new(
        origin.x() + perp.0 * width / 2.0,
        origin.y() + perp.1 * width / 2.0,
    );
    let side_b = Point::new(
        origin.x() - perp.0 * width / 2.0,
        origin.y() - perp.1 * width / 2.0,
    );

    let mut pieces: Vec<Tab> = Vec::new();
    for poly in &oriented.0 {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors().iter()) {
            let Ok(piece) = grow_piece(ring, side_a, side_b, dir) else {
                // A ring out of reach ends this polygon; built pieces stay.
                break;
            };
            let solid = match fillet_tab(&oriented, &piece.solid, fillet_radius, width) {
                Ok(solid) => solid,
                Err(err) => {
                    warn!(radius = fillet_radius, width, "fillet skipped: {err}");
                    piece.solid.clone()
                }
            };
            pieces.push(Tab {
                solid,
                face: piece.face,
            });
        }
    }
    if pieces.is_empty() {
        return Err(miss());
    }
    pieces.sort_by(|a, b| facing_bound(a, dir).total_cmp(&facing_bound(b, dir)));
    Ok(pieces.swap_remove(0))
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

struct Piece {
    solid: Polygon,
    face: LineString,
}

fn grow_piece(
    ring: &LineString,
    side_a: Point,
    side_b: Point,
    dir: (f64, f64),
) -> panelkit_geometry::Result<Piece> {
    let hit_a = closest_hit(side_a, dir, ring, TAB_REACH)?;
    let hit_b = closest_hit(side_b, dir, ring, TAB_REACH)?;
    let face = boundary_arc(ring, hit_b, hit_a);

    let mut coords: Vec<Coord> = face.0.clone();
    coords.push(Coord {
        x: side_a.x(),
        y: side_a.y(),
    });
    coords.push(Coord {
        x: side_b.x(),
        y: side_b.y(),
    });
    Ok(Piece {
        solid: Polygon::new(LineString::from(coords), vec![]),
        face,
    })
}

/// Bound of the solid on the side the direction points at; ascending order
/// is nearest-the-origin order. Diagonal directions keep construction
/// order.
fn facing_bound(tab: &Tab, dir: (f64, f64)) -> f64 {
    let Some(rect) = tab.solid.bounding_rect() else {
        return f64::INFINITY;
    };
    if dir.0 == 0.0 {
        if dir.1 < 0.0 {
            -rect.min().y
        } else {
            rect.max().y
        }
    } else if dir.1 == 0.0 {
        if dir.0 < 0.0 {
            -rect.min().x
        } else {
            rect.max().x
        }
    } else {
        0.0
    }
}

/// Round the tab's shoulder corners by closing the tab joined with the
/// substrate at the fillet radius, then carving the substrate back out.
/// The surviving piece overlapping the tab replaces it.
fn fillet_tab(
    substrate: &MultiPolygon,
    tab: &Polygon,
    radius: f64,
    width: f64,
) -> Result<Polygon> {
    if radius <= 0.0 {
        return Ok(tab.clone());
    }
    if radius * 2.0 > width {
        return Err(LayoutError::FilletUnavailable { radius, width });
    }

    let tab_shape = MultiPolygon::new(vec![tab.clone()]);
    let joined = primitives::union(substrate, &tab_shape);
    let closed = offset::close_rounded(&joined, radius);
    let relief = primitives::difference(&closed, substrate);

    let best = relief
        .0
        .into_iter()
        .map(|piece| {
            let overlap = primitives::intersection(
                &MultiPolygon::new(vec![piece.clone()]),
                &tab_shape,
            );
            (primitives::area(&overlap), piece)
        })
        .filter(|(overlap, _)| *overlap > 0.0)
        .max_by(|a, b| a.0.total_cmp(&b.0));

    match best {
        Some((_, piece)) => Ok(piece),
        None => Err(LayoutError::FilletUnavailable { radius, width }),
    }
}
