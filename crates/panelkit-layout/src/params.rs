//! Global panel parameters.
//!
//! Field names match the keys of the persisted layout record, and every
//! field carries a serde default so records written by older versions load
//! with the missing knobs at their standard values.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Perforations per tab used to derive the default tab width.
pub const DEFAULT_MB_COUNT: usize = 5;

/// How a tab's break line is manufactured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutMethod {
    /// Pick per cut: V-cut on clear lanes, mouse bites elsewhere.
    #[serde(rename = "auto")]
    Auto,
    /// Perforate every cut.
    #[serde(rename = "mb")]
    MouseBites,
    /// Groove every cut.
    #[serde(rename = "vc")]
    VCut,
    /// Both groove and perforation wherever a V-cut is eligible.
    #[serde(rename = "both")]
    Both,
}

/// Annotation layer that receives the V-cut lines on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VCutLayer {
    User1,
    #[default]
    CmtsUser,
    EdgeCuts,
}

impl VCutLayer {
    /// Layer name as written into board files.
    pub fn as_str(&self) -> &'static str {
        match self {
            VCutLayer::User1 => "User.1",
            VCutLayer::CmtsUser => "Cmts.User",
            VCutLayer::EdgeCuts => "Edge.Cuts",
        }
    }

    /// Unknown layer names fall back to the comment layer.
    pub fn from_name(name: &str) -> Self {
        match name {
            "User.1" => VCutLayer::User1,
            "Edge.Cuts" => VCutLayer::EdgeCuts,
            _ => VCutLayer::CmtsUser,
        }
    }
}

impl Serialize for VCutLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VCutLayer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(VCutLayer::from_name(&name))
    }
}

/// All global layout parameters. Lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelParams {
    /// Surround the boards with a frame.
    #[serde(default = "default_use_frame")]
    pub use_frame: bool,
    /// Shrink-wrap the panel body around the boards instead of filling
    /// the whole frame rectangle.
    #[serde(default = "default_tight")]
    pub tight: bool,
    /// Generate tab candidates automatically.
    #[serde(default = "default_auto_tab")]
    pub auto_tab: bool,
    /// Gap between boards, and between boards and rails.
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Longest stretch of board edge served by a single tab; 0 disables
    /// automatic tabs.
    #[serde(default = "default_max_tab_spacing")]
    pub max_tab_spacing: f64,
    #[serde(default = "default_cut_method")]
    pub cut_method: CutMethod,
    /// Perforation hole diameter.
    #[serde(default = "default_mb_diameter")]
    pub mb_diameter: f64,
    /// Perforation pitch.
    #[serde(default = "default_mb_spacing")]
    pub mb_spacing: f64,
    /// Width of a tab along the board edge.
    #[serde(default = "default_tab_width")]
    pub tab_width: f64,
    #[serde(default)]
    pub vc_layer: VCutLayer,
    #[serde(default = "default_frame_width")]
    pub frame_width: f64,
    #[serde(default = "default_frame_height")]
    pub frame_height: f64,
    #[serde(default = "default_frame_top")]
    pub frame_top: f64,
    #[serde(default = "default_frame_bottom")]
    pub frame_bottom: f64,
    #[serde(default = "default_frame_left")]
    pub frame_left: f64,
    #[serde(default = "default_frame_right")]
    pub frame_right: f64,
    /// Mill cutter radius simulated on the panel body and used to round
    /// tab shoulders; 0 disables both.
    #[serde(default = "default_mill_fillets")]
    pub mill_fillets: f64,
}

impl PanelParams {
    /// Perforation pitch for a hole diameter: the diameter plus a 0.3 mm
    /// web, kept to one decimal.
    pub fn derived_mb_spacing(mb_diameter: f64) -> f64 {
        ((0.3 + mb_diameter) * 10.0).round() / 10.0
    }

    /// Tab width spanning [`DEFAULT_MB_COUNT`] perforations at the given
    /// pitch, rounded up to one decimal.
    pub fn derived_tab_width(mb_spacing: f64) -> f64 {
        (mb_spacing * (DEFAULT_MB_COUNT - 1) as f64 * 10.0).ceil() / 10.0
    }
}

impl Default for PanelParams {
    fn default() -> Self {
        Self {
            use_frame: default_use_frame(),
            tight: default_tight(),
            auto_tab: default_auto_tab(),
            spacing: default_spacing(),
            max_tab_spacing: default_max_tab_spacing(),
            cut_method: default_cut_method(),
            mb_diameter: default_mb_diameter(),
            mb_spacing: default_mb_spacing(),
            tab_width: default_tab_width(),
            vc_layer: VCutLayer::default(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            frame_top: default_frame_top(),
            frame_bottom: default_frame_bottom(),
            frame_left: default_frame_left(),
            frame_right: default_frame_right(),
            mill_fillets: default_mill_fillets(),
        }
    }
}

fn default_use_frame() -> bool {
    true
}

fn default_tight() -> bool {
    true
}

fn default_auto_tab() -> bool {
    true
}

fn default_spacing() -> f64 {
    1.6
}

fn default_max_tab_spacing() -> f64 {
    50.0
}

fn default_cut_method() -> CutMethod {
    CutMethod::Auto
}

fn default_mb_diameter() -> f64 {
    0.6
}

fn default_mb_spacing() -> f64 {
    PanelParams::derived_mb_spacing(default_mb_diameter())
}

fn default_tab_width() -> f64 {
    PanelParams::derived_tab_width(default_mb_spacing())
}

fn default_frame_width() -> f64 {
    100.0
}

fn default_frame_height() -> f64 {
    100.0
}

fn default_frame_top() -> f64 {
    5.0
}

fn default_frame_bottom() -> f64 {
    5.0
}

fn default_frame_left() -> f64 {
    0.0
}

fn default_frame_right() -> f64 {
    0.0
}

fn default_mill_fillets() -> f64 {
    0.5
}
