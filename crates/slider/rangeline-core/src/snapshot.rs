//! Render snapshot: everything a render collaborator needs to draw one frame.
//! Positions are percentages of the track width.

use serde::{Deserialize, Serialize};

use crate::input::InputState;
use crate::interaction::HandleHint;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub left: f64,
    pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelView {
    pub text: String,
    pub left: f64,
    pub visible: bool,
}

/// Handle positions in fake percent. Single mode fills `single`, double mode
/// `from` and `to`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandleView {
    pub single: Option<f64>,
    pub from: Option<f64>,
    pub to: Option<f64>,
    /// Handle that should be stacked above the other.
    pub on_top: Option<HandleHint>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelsView {
    pub min: LabelView,
    pub max: LabelView,
    pub from: LabelView,
    pub to: LabelView,
    pub single: LabelView,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowsView {
    pub single: Option<Span>,
    pub from: Option<Span>,
    pub to: Option<Span>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLabel {
    pub text: String,
    /// Tick position inside the grid.
    pub left: f64,
    /// Shift applied to center the label on its tick.
    pub offset: f64,
    pub visible: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    pub left: f64,
    pub width: f64,
    pub ticks: Vec<f64>,
    pub small_ticks: Vec<f64>,
    pub labels: Vec<GridLabel>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub bar: Span,
    pub handles: HandleView,
    pub labels: LabelsView,
    pub shadows: ShadowsView,
    pub grid: Option<GridView>,
    pub input: InputState,
    pub disabled: bool,
}
