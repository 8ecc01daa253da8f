//! Frame rails.
//!
//! The frame is four independent rails around the panel rectangle. A rail
//! exists only when its margin is strictly positive; zero margins produce
//! no geometry at all. Horizontal rails span the full frame width and
//! vertical rails the full height, so adjacent rails overlap at the
//! corners.

use smallvec::SmallVec;

use panelkit_geometry::{Bounds, Polygon};

use crate::params::PanelParams;

/// Which side of the frame a rail occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl std::fmt::Display for RailSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RailSide::Top => "top",
            RailSide::Bottom => "bottom",
            RailSide::Left => "left",
            RailSide::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// A frame rail with its rectangle.
#[derive(Debug, Clone)]
pub struct Rail {
    pub side: RailSide,
    pub bounds: Bounds,
}

impl Rail {
    pub fn polygon(&self) -> Polygon {
        self.bounds.to_polygon()
    }
}

/// Active rails for the current parameters; empty when framing is off.
pub fn rails(params: &PanelParams) -> SmallVec<[Rail; 4]> {
    if !params.use_frame {
        return SmallVec::new();
    }
    let (w, h) = (params.frame_width, params.frame_height);
    let mut out = SmallVec::new();
    if params.frame_top > 0.0 {
        out.push(Rail {
            side: RailSide::Top,
            bounds: Bounds::new(0.0, 0.0, w, params.frame_top),
        });
    }
    if params.frame_bottom > 0.0 {
        out.push(Rail {
            side: RailSide::Bottom,
            bounds: Bounds::new(0.0, h - params.frame_bottom, w, h),
        });
    }
    if params.frame_left > 0.0 {
        out.push(Rail {
            side: RailSide::Left,
            bounds: Bounds::new(0.0, 0.0, params.frame_left, h),
        });
    }
    if params.frame_right > 0.0 {
        out.push(Rail {
            side: RailSide::Right,
            bounds: Bounds::new(w - params.frame_right, 0.0, w, h),
        });
    }
    out
}

/// The whole frame rectangle.
pub fn frame_bounds(params: &PanelParams) -> Bounds {
    Bounds::new(0.0, 0.0, params.frame_width, params.frame_height)
}
