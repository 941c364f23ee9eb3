//! Measurement provider contract.
//!
//! The core never touches the render surface; it asks the host for the few
//! pixel sizes it needs. Every method is called on each calculation pass, so
//! implementations must be cheap and synchronous.

use serde::{Deserialize, Serialize};

/// Which label a width is requested for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSlot {
    Min,
    Max,
    From,
    To,
    Single,
    Grid(usize),
}

pub trait Measure {
    /// Track width in pixels. `0` means "not laid out yet".
    fn track_width(&self) -> f64;

    /// Width of one handle in pixels.
    fn handle_width(&self) -> f64;

    /// Rendered width of a label showing `text`.
    fn label_width(&self, _slot: LabelSlot, _text: &str) -> f64 {
        0.0
    }
}

impl<M: Measure + ?Sized> Measure for &M {
    fn track_width(&self) -> f64 {
        (**self).track_width()
    }
    fn handle_width(&self) -> f64 {
        (**self).handle_width()
    }
    fn label_width(&self, slot: LabelSlot, text: &str) -> f64 {
        (**self).label_width(slot, text)
    }
}

impl<M: Measure + ?Sized> Measure for Box<M> {
    fn track_width(&self) -> f64 {
        (**self).track_width()
    }
    fn handle_width(&self) -> f64 {
        (**self).handle_width()
    }
    fn label_width(&self, slot: LabelSlot, text: &str) -> f64 {
        (**self).label_width(slot, text)
    }
}

/// Fixed geometry with monospace labels; used by headless hosts and tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedMetrics {
    pub track: f64,
    pub handle: f64,
    /// Width of one label character in pixels.
    pub char_width: f64,
}

impl FixedMetrics {
    pub fn new(track: f64, handle: f64) -> Self {
        Self {
            track,
            handle,
            char_width: 0.0,
        }
    }

    pub fn with_char_width(mut self, char_width: f64) -> Self {
        self.char_width = char_width;
        self
    }
}

impl Measure for FixedMetrics {
    fn track_width(&self) -> f64 {
        self.track
    }

    fn handle_width(&self) -> f64 {
        self.handle
    }

    fn label_width(&self, _slot: LabelSlot, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}
