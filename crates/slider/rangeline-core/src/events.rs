//! Lifecycle events and listener registration.

use serde::{Deserialize, Serialize};

use crate::config::CustomValue;
use crate::ids::InstanceId;
use crate::input::InputState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderEventKind {
    /// First scene synchronization after construction.
    Start,
    /// A user-driven pass moved `from` or `to`.
    Change,
    /// A drag was released inside the slider, or a key step/click settled.
    Finish,
    /// First scene synchronization after `update()`/`reset()`.
    Update,
}

/// Current result of the slider, handed to every listener.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SliderData {
    pub min: f64,
    pub max: f64,
    pub min_pretty: String,
    pub max_pretty: String,

    pub from: f64,
    pub from_percent: f64,
    pub from_pretty: String,
    /// Custom value at `from`, when a value list is configured.
    pub from_value: Option<CustomValue>,

    pub to: f64,
    pub to_percent: f64,
    pub to_pretty: String,
    pub to_value: Option<CustomValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderEvent {
    pub kind: SliderEventKind,
    pub instance: InstanceId,
    pub data: SliderData,
    pub input: InputState,
}

pub type Listener = Box<dyn FnMut(&SliderEvent)>;

/// Registered callbacks, called in registration order.
#[derive(Default)]
pub struct Listeners {
    start: Vec<Listener>,
    change: Vec<Listener>,
    finish: Vec<Listener>,
    update: Vec<Listener>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("start", &self.start.len())
            .field("change", &self.change.len())
            .field("finish", &self.finish.len())
            .field("update", &self.update.len())
            .finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: SliderEventKind) -> &mut Vec<Listener> {
        match kind {
            SliderEventKind::Start => &mut self.start,
            SliderEventKind::Change => &mut self.change,
            SliderEventKind::Finish => &mut self.finish,
            SliderEventKind::Update => &mut self.update,
        }
    }

    pub fn on<F>(&mut self, kind: SliderEventKind, listener: F)
    where
        F: FnMut(&SliderEvent) + 'static,
    {
        self.slot(kind).push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &SliderEvent) {
        for listener in self.slot(event.kind).iter_mut() {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.start.clear();
        self.change.clear();
        self.finish.clear();
        self.update.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
            && self.change.is_empty()
            && self.finish.is_empty()
            && self.update.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(kind: SliderEventKind) -> SliderEvent {
        SliderEvent {
            kind,
            instance: InstanceId(7),
            data: SliderData::default(),
            input: InputState::default(),
        }
    }

    #[test]
    fn emit_routes_by_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for kind in [SliderEventKind::Start, SliderEventKind::Finish] {
            let seen = seen.clone();
            listeners.on(kind, move |e| seen.borrow_mut().push(e.kind));
        }

        listeners.emit(&event(SliderEventKind::Change));
        listeners.emit(&event(SliderEventKind::Finish));
        listeners.emit(&event(SliderEventKind::Start));
        assert_eq!(
            *seen.borrow(),
            vec![SliderEventKind::Finish, SliderEventKind::Start]
        );

        listeners.clear();
        assert!(listeners.is_empty());
    }
}
