//! Rangeline Core (render-agnostic)
//!
//! Range slider logic with one or two handles: configuration resolution,
//! value/percent conversion, the pointer/keyboard interaction state machine
//! and a scene synchronizer that produces render snapshots. The host supplies
//! measurements through [`Measure`], delivers scheduled ticks, and applies
//! [`RenderSnapshot`]s to whatever it draws with.

pub mod config;
pub mod convert;
pub mod error;
pub mod events;
pub mod format;
pub mod grid;
pub mod ids;
pub mod input;
pub mod interaction;
pub mod measure;
pub mod resolve;
pub mod scene;
pub mod scheduler;
pub mod slider;
pub mod snapshot;

// Re-exports for consumers (adapters)
pub use config::{Config, CustomValue, Numeric, PartialConfig, SliderType, UpdateHint};
pub use convert::{fake_to_real, real_to_fake, to_fixed, Converter};
pub use error::{Result, SliderError};
pub use events::{Listeners, SliderData, SliderEvent, SliderEventKind};
pub use format::{Formatter, PrettifyFn};
pub use ids::{IdAllocator, InstanceId, PointerCapture};
pub use input::InputState;
pub use interaction::{HandleHint, InteractionState, KeyDirection, PointerOrigin, Target};
pub use measure::{FixedMetrics, LabelSlot, Measure};
pub use resolve::resolve;
pub use scene::{Cause, Scene, SyncOutcome};
pub use scheduler::{Scheduler, TickKind, TickRequest, TickToken, IDLE_INTERVAL};
pub use slider::{Slider, SliderBuilder};
pub use snapshot::{
    GridLabel, GridView, HandleView, LabelView, LabelsView, RenderSnapshot, ShadowsView, Span,
};
