//! Scene synchronizer.
//!
//! Decides on every scheduled pass whether the visual state must be rebuilt,
//! rebuilds the [`RenderSnapshot`] when it does, and tells the caller which
//! lifecycle events the pass implies.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::convert::{to_fixed, Converter, DEFAULT_PRECISION};
use crate::error::Result;
use crate::format::Formatter;
use crate::grid;
use crate::input::InputState;
use crate::interaction::{InteractionState, Target};
use crate::measure::{LabelSlot, Measure};
use crate::snapshot::{
    GridView, HandleView, LabelView, LabelsView, RenderSnapshot, ShadowsView, Span,
};

/// Why a synchronization pass runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    Init,
    Update,
    Resize,
    Key,
    Click,
    Focus,
    Drag,
    Release,
    #[default]
    Idle,
}

impl Cause {
    /// Passes that redraw even when the values did not move.
    pub fn forces_redraw(self) -> bool {
        matches!(
            self,
            Cause::Init | Cause::Update | Cause::Click | Cause::Focus | Cause::Release
        )
    }

    fn rank(self) -> u8 {
        match self {
            Cause::Init => 8,
            Cause::Update => 7,
            Cause::Click => 6,
            Cause::Key => 5,
            Cause::Focus => 4,
            Cause::Release => 3,
            Cause::Resize => 2,
            Cause::Drag => 1,
            Cause::Idle => 0,
        }
    }

    /// Keep the more significant of two causes queued for the same pass.
    pub fn merge(self, other: Cause) -> Cause {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

/// Result of one non-deferred pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Cause after resize detection.
    pub cause: Cause,
    /// `from` or `to` differs from the last rendered values.
    pub changed: bool,
    /// A new snapshot was produced.
    pub redrawn: bool,
    pub emit_change: bool,
    pub emit_finish: bool,
}

impl SyncOutcome {
    fn quiet(cause: Cause) -> Self {
        Self {
            cause,
            changed: false,
            redrawn: false,
            emit_change: false,
            emit_finish: false,
        }
    }
}

fn check_edges(cfg: &Config, left: f64, width: f64) -> f64 {
    if !cfg.force_edges {
        return to_fixed(left, DEFAULT_PRECISION);
    }
    let left = if left < 0.0 {
        0.0
    } else if left > 100.0 - width {
        100.0 - width
    } else {
        left
    };
    to_fixed(left, DEFAULT_PRECISION)
}

/// Shadow span for the `[lo, hi]` window of one handle, in fake space.
fn shadow(conv: &Converter<'_>, lo: Option<f64>, hi: Option<f64>, hp: f64) -> Option<Span> {
    if lo.is_none() && hi.is_none() {
        return None;
    }
    let cfg = conv.config();
    let lo_p = conv.percent_or_zero(lo.unwrap_or(cfg.min));
    let width = conv.percent_or_zero(hi.unwrap_or(cfg.max)) - lo_p;
    Some(Span {
        left: to_fixed(lo_p - hp / 100.0 * lo_p, DEFAULT_PRECISION) + hp / 2.0,
        width: to_fixed(width - hp / 100.0 * width, DEFAULT_PRECISION),
    })
}

/// Label text for a domain value; lookup failures propagate.
fn value_text(cfg: &Config, fmt: &Formatter, v: f64) -> Result<String> {
    if cfg.has_values() {
        Ok(fmt.decorate(cfg, cfg.pretty_value(v)?, None))
    } else {
        Ok(fmt.decorate(cfg, &fmt.prettify(cfg, v), Some(v)))
    }
}

/// Text of the collapsed label joining `from` and `to`.
fn collapsed_text(cfg: &Config, fmt: &Formatter, from: f64, to: f64) -> Result<String> {
    let sep = &cfg.values_separator;
    if cfg.has_values() {
        let f = cfg.pretty_value(from)?;
        let t = cfg.pretty_value(to)?;
        Ok(if cfg.decorate_both {
            format!("{}{sep}{}", fmt.decorate(cfg, f, None), fmt.decorate(cfg, t, None))
        } else {
            fmt.decorate(cfg, &format!("{f}{sep}{t}"), None)
        })
    } else {
        let f = fmt.prettify(cfg, from);
        let t = fmt.prettify(cfg, to);
        Ok(if cfg.decorate_both {
            format!(
                "{}{sep}{}",
                fmt.decorate(cfg, &f, Some(from)),
                fmt.decorate(cfg, &t, Some(to))
            )
        } else {
            fmt.decorate(cfg, &format!("{f}{sep}{t}"), Some(to))
        })
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    old_track_width: f64,
    old_from: Option<f64>,
    old_to: Option<f64>,
    min_label: LabelView,
    max_label: LabelView,
    p_min: f64,
    p_max: f64,
    grid: Option<GridView>,
    shadows: ShadowsView,
    last: Option<RenderSnapshot>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent snapshot, if anything has been rendered yet.
    pub fn snapshot(&self) -> Option<&RenderSnapshot> {
        self.last.as_ref()
    }

    /// Run one pass. `Ok(None)` means the track is not laid out and the pass
    /// was deferred; the caller keeps its pending cause for the next one.
    pub fn synchronize(
        &mut self,
        cfg: &Config,
        fmt: &Formatter,
        measure: &dyn Measure,
        state: &mut InteractionState,
        cause: Cause,
    ) -> Result<Option<SyncOutcome>> {
        let width = measure.track_width();
        if width <= 0.0 {
            debug!("track not laid out, deferring {:?} pass", cause);
            return Ok(None);
        }

        let mut cause = cause;
        let resized = width != self.old_track_width;
        let mut force = cause.forces_redraw();

        if resized || force {
            if resized {
                if matches!(cause, Cause::Drag | Cause::Idle) {
                    cause = Cause::Resize;
                }
                debug!("track width {} -> {}", self.old_track_width, width);
            }
            let grabbed = state.target;
            if resized {
                state.target = Target::Base;
            }
            self.set_min_max(cfg, fmt, measure, width)?;
            state.calc(cfg, fmt, measure, true)?;
            if resized && state.is_active {
                state.target = grabbed;
            }

            self.grid = if cfg.grid {
                Some(grid::build(cfg, fmt, measure, width, state.handle_percent)?)
            } else {
                None
            };
            self.shadows = Self::shadows_for(cfg, state);
            self.old_track_width = width;
            force = true;
        }

        if !state.dragging && !force && cause != Cause::Key {
            return Ok(Some(SyncOutcome::quiet(cause)));
        }

        let changed =
            self.old_from != Some(state.data.from) || self.old_to != Some(state.data.to);
        if !changed && !force && cause != Cause::Key {
            return Ok(Some(SyncOutcome::quiet(cause)));
        }

        let snapshot = self.render(cfg, fmt, measure, state, width)?;
        self.last = Some(snapshot);
        self.old_from = Some(state.data.from);
        self.old_to = Some(state.data.to);

        let suppressed = resized || matches!(cause, Cause::Init | Cause::Update | Cause::Resize);
        Ok(Some(SyncOutcome {
            cause,
            changed,
            redrawn: true,
            emit_change: changed && !suppressed,
            emit_finish: matches!(cause, Cause::Key | Cause::Click),
        }))
    }

    fn label_percent(measure: &dyn Measure, width: f64, slot: LabelSlot, text: &str) -> f64 {
        to_fixed(measure.label_width(slot, text) / width * 100.0, DEFAULT_PRECISION)
    }

    fn set_min_max(
        &mut self,
        cfg: &Config,
        fmt: &Formatter,
        measure: &dyn Measure,
        width: f64,
    ) -> Result<()> {
        let min_text = fmt.label(cfg, cfg.min)?;
        let max_text = fmt.label(cfg, cfg.max)?;
        self.p_min = Self::label_percent(measure, width, LabelSlot::Min, &min_text);
        self.p_max = Self::label_percent(measure, width, LabelSlot::Max, &max_text);
        let visible = !cfg.hide_min_max;
        self.min_label = LabelView {
            text: min_text,
            left: 0.0,
            visible,
        };
        self.max_label = LabelView {
            text: max_text,
            left: to_fixed(100.0 - self.p_max, DEFAULT_PRECISION),
            visible,
        };
        Ok(())
    }

    fn shadows_for(cfg: &Config, state: &InteractionState) -> ShadowsView {
        let conv = Converter::new(cfg);
        let hp = state.handle_percent;
        let mut view = ShadowsView::default();
        if cfg.is_double() {
            if cfg.from_shadow {
                view.from = shadow(&conv, cfg.from_min, cfg.from_max, hp);
            }
            if cfg.to_shadow {
                view.to = shadow(&conv, cfg.to_min, cfg.to_max, hp);
            }
        } else if cfg.from_shadow {
            view.single = shadow(&conv, cfg.from_min, cfg.from_max, hp);
        }
        view
    }

    fn render(
        &self,
        cfg: &Config,
        fmt: &Formatter,
        measure: &dyn Measure,
        state: &InteractionState,
        width: f64,
    ) -> Result<RenderSnapshot> {
        let handles = if cfg.is_double() {
            HandleView {
                single: None,
                from: Some(state.from_fake),
                to: Some(state.to_fake),
                on_top: state.on_top,
            }
        } else {
            HandleView {
                single: Some(state.single_fake),
                ..HandleView::default()
            }
        };

        Ok(RenderSnapshot {
            bar: state.bar,
            handles,
            labels: self.labels(cfg, fmt, measure, state, width)?,
            shadows: self.shadows,
            grid: self.grid.clone(),
            input: InputState::from_data(cfg, &state.data),
            disabled: cfg.is_inert(),
        })
    }

    fn labels(
        &self,
        cfg: &Config,
        fmt: &Formatter,
        measure: &dyn Measure,
        state: &InteractionState,
        width: f64,
    ) -> Result<LabelsView> {
        let mut labels = LabelsView {
            min: self.min_label.clone(),
            max: self.max_label.clone(),
            ..LabelsView::default()
        };
        let hp = state.handle_percent;
        let d = &state.data;
        let shown = !cfg.hide_from_to;

        if !cfg.is_double() {
            let text = value_text(cfg, fmt, d.from)?;
            let p = Self::label_percent(measure, width, LabelSlot::Single, &text);
            let left = check_edges(cfg, state.single_fake + hp / 2.0 - p / 2.0, p);
            labels.single = LabelView {
                text,
                left,
                visible: shown,
            };
            if shown && !cfg.hide_min_max {
                labels.min.visible = left >= self.p_min + 1.0;
                labels.max.visible = left + p <= 100.0 - self.p_max - 1.0;
            }
            return Ok(labels);
        }

        let from_text = value_text(cfg, fmt, d.from)?;
        let to_text = value_text(cfg, fmt, d.to)?;
        let single_text = collapsed_text(cfg, fmt, d.from, d.to)?;

        let p_from = Self::label_percent(measure, width, LabelSlot::From, &from_text);
        let from_left = check_edges(
            cfg,
            to_fixed(state.from_fake + hp / 2.0 - p_from / 2.0, DEFAULT_PRECISION),
            p_from,
        );
        let p_to = Self::label_percent(measure, width, LabelSlot::To, &to_text);
        let to_left = check_edges(
            cfg,
            to_fixed(state.to_fake + hp / 2.0 - p_to / 2.0, DEFAULT_PRECISION),
            p_to,
        );
        let p_single = Self::label_percent(measure, width, LabelSlot::Single, &single_text);
        let single_left = check_edges(
            cfg,
            to_fixed(
                (from_left + to_left + p_to) / 2.0 - p_single / 2.0,
                DEFAULT_PRECISION,
            ),
            p_single,
        );

        labels.from = LabelView {
            text: from_text,
            left: from_left,
            visible: false,
        };
        labels.to = LabelView {
            text: to_text,
            left: to_left,
            visible: false,
        };
        labels.single = LabelView {
            text: single_text,
            left: single_left,
            visible: false,
        };
        if !shown {
            return Ok(labels);
        }

        let single_right = single_left + p_single;
        let to_right = to_left + p_to;
        let min_edge = single_left.min(from_left);
        let max_edge;

        if from_left + p_from >= to_left {
            if d.from == d.to {
                if state.target == Target::To {
                    labels.to.visible = true;
                } else {
                    labels.from.visible = true;
                }
                max_edge = to_right;
            } else {
                labels.single.visible = true;
                max_edge = single_right.max(to_right);
            }
        } else {
            labels.from.visible = true;
            labels.to.visible = true;
            max_edge = single_right.max(to_right);
        }

        if !cfg.hide_min_max {
            labels.min.visible = min_edge >= self.p_min + 1.0;
            labels.max.visible = max_edge <= 100.0 - self.p_max - 1.0;
        }
        Ok(labels)
    }
}
