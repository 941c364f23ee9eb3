//! One slider instance: configuration, interaction state, scene, scheduling
//! and listeners behind the entry points a host drives.

use log::debug;

use crate::config::{Config, PartialConfig, UpdateHint};
use crate::error::Result;
use crate::events::{Listeners, SliderData, SliderEvent, SliderEventKind};
use crate::format::{Formatter, PrettifyFn};
use crate::ids::InstanceId;
use crate::input::InputState;
use crate::interaction::{HandleHint, InteractionState, KeyDirection, PointerOrigin, Target};
use crate::measure::Measure;
use crate::resolve::resolve;
use crate::scene::{Cause, Scene};
use crate::scheduler::{Scheduler, TickKind, TickRequest, TickToken};
use crate::snapshot::RenderSnapshot;

fn refresh_pretty(cfg: &mut Config, fmt: &Formatter) {
    if cfg.has_values() {
        cfg.pretty_values = fmt.pretty_values(cfg);
    }
}

/// Collects construction-time options for a [`Slider`].
pub struct SliderBuilder {
    partial: PartialConfig,
    prettify: Option<PrettifyFn>,
    listeners: Listeners,
}

impl SliderBuilder {
    pub fn new(partial: PartialConfig) -> Self {
        Self {
            partial,
            prettify: None,
            listeners: Listeners::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(PartialConfig::from_json(json)?))
    }

    /// Replace digit grouping with a custom formatter.
    pub fn prettify<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        self.prettify = Some(Box::new(f));
        self
    }

    pub fn on<F>(mut self, kind: SliderEventKind, listener: F) -> Self
    where
        F: FnMut(&SliderEvent) + 'static,
    {
        self.listeners.on(kind, listener);
        self
    }

    /// Resolve the configuration and run the first synchronization. Fails on
    /// malformed configuration; nothing is created in that case.
    pub fn build<M: Measure>(self, id: InstanceId, measure: M) -> Result<Slider<M>> {
        let formatter = match self.prettify {
            Some(f) => Formatter::with_prettify(f),
            None => Formatter::new(),
        };
        let mut config = resolve(&Config::unresolved(), &self.partial, None)?;
        refresh_pretty(&mut config, &formatter);
        let state = InteractionState::new(&config, &formatter)?;
        let input = InputState::from_data(&config, &state.data);

        let mut slider = Slider {
            id,
            config,
            formatter,
            state,
            scene: Scene::new(),
            scheduler: Scheduler::new(),
            listeners: self.listeners,
            measure,
            pending: None,
            input,
            destroyed: false,
        };
        debug!("slider {:?} created", id);
        slider.init(Cause::Init)?;
        Ok(slider)
    }
}

pub struct Slider<M: Measure> {
    id: InstanceId,
    config: Config,
    formatter: Formatter,
    state: InteractionState,
    scene: Scene,
    scheduler: Scheduler,
    listeners: Listeners,
    measure: M,
    pending: Option<Cause>,
    input: InputState,
    destroyed: bool,
}

impl<M: Measure> Slider<M> {
    #[inline]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[inline]
    pub fn data(&self) -> &SliderData {
        &self.state.data
    }

    /// Value string and data attributes for the bound input.
    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn render_snapshot(&self) -> Option<&RenderSnapshot> {
        if self.destroyed {
            return None;
        }
        self.scene.snapshot()
    }

    /// The tick the host should deliver next, if any.
    #[inline]
    pub fn scheduled(&self) -> Option<TickRequest> {
        self.scheduler.pending()
    }

    pub fn formatted_value(&self, value: f64) -> Result<String> {
        self.formatter.label(&self.config, value)
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    pub fn measure_mut(&mut self) -> &mut M {
        &mut self.measure
    }

    pub fn on<F>(&mut self, kind: SliderEventKind, listener: F)
    where
        F: FnMut(&SliderEvent) + 'static,
    {
        self.listeners.on(kind, listener);
    }

    fn interactive(&self) -> bool {
        !self.destroyed && !self.config.is_inert()
    }

    fn queue(&mut self, cause: Cause) {
        self.pending = Some(match self.pending {
            Some(p) => p.merge(cause),
            None => cause,
        });
    }

    fn calc(&mut self, remeasure: bool) -> Result<()> {
        self.state
            .calc(&self.config, &self.formatter, &self.measure, remeasure)
    }

    fn init(&mut self, cause: Cause) -> Result<()> {
        self.pending = Some(cause);
        self.calc(true)?;
        self.sync()
    }

    fn emit(&mut self, kind: SliderEventKind) {
        self.input = InputState::from_data(&self.config, &self.state.data);
        let event = SliderEvent {
            kind,
            instance: self.id,
            data: self.state.data.clone(),
            input: self.input.clone(),
        };
        self.listeners.emit(&event);
    }

    /// One synchronization pass followed by the next tick request.
    fn sync(&mut self) -> Result<()> {
        let cause = self.pending.unwrap_or(if self.state.dragging {
            Cause::Drag
        } else {
            Cause::Idle
        });
        let outcome = self.scene.synchronize(
            &self.config,
            &self.formatter,
            &self.measure,
            &mut self.state,
            cause,
        )?;

        if let Some(outcome) = outcome {
            self.pending = None;
            if outcome.redrawn {
                if let Some(snapshot) = self.scene.snapshot() {
                    self.input = snapshot.input.clone();
                }
            }
            match outcome.cause {
                Cause::Init => self.emit(SliderEventKind::Start),
                Cause::Update => self.emit(SliderEventKind::Update),
                _ => {}
            }
            if outcome.emit_change {
                self.emit(SliderEventKind::Change);
            }
            if outcome.emit_finish {
                self.emit(SliderEventKind::Finish);
            }
        }

        let kind = if self.state.is_active {
            TickKind::AnimationFrame
        } else {
            TickKind::idle()
        };
        self.scheduler.request(kind);
        Ok(())
    }

    /// Deliver a scheduled tick. Returns `false` for stale tokens.
    pub fn tick(&mut self, token: TickToken) -> Result<bool> {
        if self.destroyed || !self.scheduler.accept(token) {
            return Ok(false);
        }
        self.sync()?;
        Ok(true)
    }

    pub fn on_pointer_down(&mut self, hint: Option<HandleHint>, pointer_x: f64) -> Result<()> {
        if !self.interactive() || self.state.no_range {
            return Ok(());
        }
        self.state.grab(&self.config, hint, pointer_x);
        self.sync()
    }

    /// Recompute only; the next animation frame renders.
    pub fn on_pointer_move(&mut self, pointer_x: f64) -> Result<()> {
        if self.destroyed || !self.state.dragging {
            return Ok(());
        }
        self.state.pointer_x = pointer_x;
        self.calc(false)
    }

    pub fn on_pointer_up(&mut self, origin: PointerOrigin) -> Result<()> {
        if self.destroyed || !self.state.is_active {
            return Ok(());
        }
        self.state.is_active = false;
        self.queue(Cause::Release);
        self.sync()?;
        self.state.release();
        if origin == PointerOrigin::Inside {
            self.emit(SliderEventKind::Finish);
        }
        self.state.dragging = false;
        Ok(())
    }

    fn click(&mut self, pointer_x: f64, on_bar: bool) -> Result<()> {
        if !self.interactive() || self.state.no_range {
            return Ok(());
        }
        self.state.click(pointer_x, on_bar);
        self.queue(Cause::Click);
        self.calc(false)?;
        self.sync()
    }

    /// Click on the track away from any handle.
    pub fn on_track_click(&mut self, pointer_x: f64) -> Result<()> {
        self.click(pointer_x, false)
    }

    /// Click on the bar between the handles.
    pub fn on_bar_click(&mut self, pointer_x: f64) -> Result<()> {
        self.click(pointer_x, true)
    }

    /// Step the targeted handle. Returns whether the key was consumed.
    pub fn on_key_step(&mut self, dir: KeyDirection) -> Result<bool> {
        if !self.interactive() || !self.config.keyboard || self.state.no_range {
            return Ok(false);
        }
        self.state.prepare_key_step(&self.config, dir)?;
        // Interval steps hold the current span.
        let hold_span = self.state.target == Target::Both;
        if hold_span {
            self.state.tighten_min_interval();
        }
        self.queue(Cause::Key);
        let stepped = self.calc(false).and_then(|()| self.sync());
        if hold_span {
            self.state.restore_min_interval();
        }
        stepped?;
        Ok(true)
    }

    /// Focus arrived with nothing targeted: target the default handle so
    /// keyboard steps have something to move.
    pub fn on_focus_without_target(&mut self) -> Result<()> {
        if !self.interactive() || self.state.no_range || self.state.target != Target::None {
            return Ok(());
        }
        self.state.focus_default_handle(&self.config);
        self.queue(Cause::Focus);
        self.calc(false)?;
        self.sync()
    }

    /// Merge `partial` over the current configuration, keeping the current
    /// values as the baseline, and rebuild from scratch.
    pub fn update(&mut self, partial: &PartialConfig) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let hint = UpdateHint {
            from: self.state.data.from,
            to: self.state.data.to,
        };
        let mut base = self.config.clone();
        base.from = hint.from;
        base.to = hint.to;

        let mut config = resolve(&base, partial, Some(hint))?;
        refresh_pretty(&mut config, &self.formatter);
        let state = InteractionState::new(&config, &self.formatter)?;

        self.scheduler.cancel();
        self.config = config;
        self.state = state;
        self.scene = Scene::new();
        debug!("slider {:?} updated", self.id);
        self.init(Cause::Update)
    }

    /// Return to the values of the last construction or update.
    pub fn reset(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        debug!("slider {:?} reset", self.id);
        self.state.data.from = self.config.from;
        self.state.data.to = self.config.to;
        self.update(&PartialConfig::default())
    }

    /// Cancel pending ticks and drop listeners. Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.scheduler.cancel();
        self.listeners.clear();
        self.state.is_active = false;
        self.state.dragging = false;
        self.pending = None;
        self.destroyed = true;
        debug!("slider {:?} destroyed", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedMetrics;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn start_waits_for_layout() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut slider = SliderBuilder::from_json(r#"{"min":0,"max":100,"from":40}"#)
            .unwrap()
            .on(SliderEventKind::Start, move |e| log.borrow_mut().push(e.data.from))
            .build(InstanceId(0), FixedMetrics::new(0.0, 10.0))
            .unwrap();
        assert!(seen.borrow().is_empty());
        assert!(slider.render_snapshot().is_none());

        slider.measure_mut().track = 400.0;
        let token = slider.scheduled().unwrap().token;
        assert!(slider.tick(token).unwrap());
        assert_eq!(*seen.borrow(), vec![40.0]);
        assert!(slider.render_snapshot().is_some());

        // A replayed token is stale.
        assert!(!slider.tick(token).unwrap());
    }

    #[test]
    fn ticks_follow_drag_state() {
        let mut slider = SliderBuilder::from_json(r#"{"min":0,"max":100}"#)
            .unwrap()
            .build(InstanceId(3), FixedMetrics::new(1000.0, 0.0))
            .unwrap();
        assert_eq!(slider.scheduled().unwrap().kind, TickKind::idle());

        slider.on_pointer_down(Some(HandleHint::Single), 0.0).unwrap();
        assert_eq!(slider.scheduled().unwrap().kind, TickKind::AnimationFrame);

        slider.on_pointer_up(PointerOrigin::Inside).unwrap();
        assert_eq!(slider.scheduled().unwrap().kind, TickKind::idle());

        slider.destroy();
        assert_eq!(slider.scheduled(), None);
        assert!(slider.render_snapshot().is_none());
    }

    #[test]
    fn formatted_value_uses_custom_prettify() {
        let slider = SliderBuilder::from_json(r#"{"min":0,"max":10000,"postfix":" pts"}"#)
            .unwrap()
            .prettify(|n| format!("{:.1}", n / 1000.0) + "k")
            .build(InstanceId(1), FixedMetrics::new(500.0, 10.0))
            .unwrap();
        assert_eq!(slider.formatted_value(2500.0).unwrap(), "2.5k pts");
    }
}
