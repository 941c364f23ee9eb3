//! Interaction state machine.
//!
//! [`InteractionState`] holds everything that changes while the user works
//! the slider: which handle is targeted, handle positions in real and fake
//! percent, the pointer, and the current [`SliderData`] result. A calculation
//! pass ([`InteractionState::calc`]) turns the pointer position into handle
//! positions for the current target and refreshes the result.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::convert::{fake_to_real, real_to_fake, to_fixed, Converter, DEFAULT_PRECISION};
use crate::error::Result;
use crate::events::SliderData;
use crate::format::Formatter;
use crate::measure::Measure;
use crate::snapshot::Span;

/// Calculation passes between re-measurements of track and handle.
pub const REMEASURE_EVERY: u32 = 10;

/// What the next calculation pass acts on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Nothing grabbed.
    #[default]
    None,
    /// Recompute positions from the configured values.
    Base,
    Single,
    From,
    To,
    /// Both handles dragged by the bar, keeping the pointer gaps.
    Both,
    /// Both handles re-centered on a bar click, keeping the span.
    BothOne,
    /// Track or bar clicked; resolved to a concrete target on the next pass.
    Click,
}

/// Which handle the host saw the pointer go down on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleHint {
    Single,
    From,
    To,
    Both,
}

impl HandleHint {
    /// Target for this hint under `cfg`, or `None` when the hint does not
    /// apply and the handle should be chosen by pointer position.
    pub fn target(self, cfg: &Config) -> Option<Target> {
        if !cfg.is_double() {
            return Some(Target::Single);
        }
        match self {
            HandleHint::Single | HandleHint::From => Some(Target::From),
            HandleHint::To => Some(Target::To),
            HandleHint::Both if cfg.drag_interval => Some(Target::Both),
            HandleHint::Both => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDirection {
    Decrease,
    Increase,
}

impl KeyDirection {
    /// Arrow keys plus W/A/S/D. Anything else is not a slider key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "ArrowDown" | "a" | "A" | "s" | "S" => Some(KeyDirection::Decrease),
            "ArrowRight" | "ArrowUp" | "d" | "D" | "w" | "W" => Some(KeyDirection::Increase),
            _ => None,
        }
    }

    fn sign(self) -> f64 {
        match self {
            KeyDirection::Decrease => -1.0,
            KeyDirection::Increase => 1.0,
        }
    }
}

/// Where a pointer-up happened relative to the slider's bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerOrigin {
    Inside,
    Outside,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    From,
    To,
}

fn check_max_interval(conv: &Converter<'_>, side: Side, p: f64, other: f64) -> f64 {
    let max_interval = conv.config().max_interval;
    if max_interval <= 0.0 {
        return p;
    }
    let decimals = conv.precision();
    let current = conv.to_value(p);
    let next = conv.to_value(other);
    let adjusted = match side {
        Side::From if to_fixed(next - current, decimals) > max_interval => next - max_interval,
        Side::To if to_fixed(current - next, decimals) > max_interval => next + max_interval,
        _ => return p,
    };
    conv.percent_or_zero(to_fixed(adjusted, decimals))
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    pub target: Target,

    /// Real percents.
    pub single_percent: f64,
    pub from_percent: f64,
    pub to_percent: f64,

    /// Fake percents, i.e. handle left edges.
    pub single_fake: f64,
    pub from_fake: f64,
    pub to_fake: f64,

    /// Pointer position in pixels relative to the track.
    pub pointer_x: f64,
    /// Pointer position as a percent of the track, clamped to `[0,100]`.
    pub pointer_percent: f64,

    pub gap: f64,
    pub gap_left: f64,
    pub gap_right: f64,

    /// A pointer is down on this slider.
    pub is_active: bool,
    /// Set between pointer-down and pointer-up; drives frame-rate syncing.
    pub dragging: bool,
    /// `min == max`.
    pub no_range: bool,

    pub track_width: f64,
    pub handle_width: f64,
    pub handle_percent: f64,

    pub bar: Span,
    pub on_top: Option<HandleHint>,

    pub data: SliderData,

    click_on_bar: bool,
    calc_count: u32,
    min_interval_override: Option<f64>,
}

impl InteractionState {
    /// Fresh state for `cfg`, positioned at the configured values and waiting
    /// for a `Base` pass.
    pub fn new(cfg: &Config, fmt: &Formatter) -> Result<Self> {
        let mut state = Self {
            target: Target::Base,
            no_range: cfg.max == cfg.min,
            ..Self::default()
        };
        state.data.from = cfg.from;
        state.data.to = cfg.to;
        state.recalc_base(&Converter::new(cfg), cfg);
        state.update_bar(cfg);
        state.write_result(cfg, fmt)?;
        Ok(state)
    }

    /// Read track and handle widths from the provider.
    pub fn measure(&mut self, measure: &dyn Measure) {
        self.track_width = measure.track_width();
        self.handle_width = measure.handle_width();
        if self.track_width > 0.0 {
            self.handle_percent =
                to_fixed(self.handle_width / self.track_width * 100.0, DEFAULT_PRECISION);
        }
    }

    /// One calculation pass. Without a laid-out track this is a no-op.
    pub fn calc(
        &mut self,
        cfg: &Config,
        fmt: &Formatter,
        measure: &dyn Measure,
        remeasure: bool,
    ) -> Result<()> {
        self.calc_count += 1;
        if remeasure || self.calc_count >= REMEASURE_EVERY {
            self.calc_count = 0;
            self.measure(measure);
        }
        if self.track_width <= 0.0 {
            return Ok(());
        }

        self.calc_pointer_percent();
        let conv = Converter::new(cfg);
        let hp = self.handle_percent;
        let mut handle_x = self.handle_x();

        if self.target == Target::Click {
            self.gap = hp / 2.0;
            handle_x = self.handle_x();
            self.target = if cfg.is_double() && cfg.drag_interval && self.click_on_bar {
                Target::BothOne
            } else {
                self.choose_handle(cfg, fake_to_real(handle_x, hp))
            };
        }

        match self.target {
            Target::Base => {
                self.recalc_base(&conv, cfg);
                self.target = Target::None;
            }
            Target::Single => {
                if !cfg.from_fixed {
                    let p = conv.quantize_to_step(fake_to_real(handle_x, hp));
                    let p = conv.clamp_to_window(p, cfg.from_min, cfg.from_max);
                    self.single_percent = p.clamp(0.0, 100.0);
                }
            }
            Target::From => {
                if !cfg.from_fixed {
                    let raw = fake_to_real(handle_x, hp);
                    self.from_percent = self.settle(&conv, Side::From, raw, self.to_percent);
                }
            }
            Target::To => {
                if !cfg.to_fixed {
                    let raw = fake_to_real(handle_x, hp);
                    self.to_percent = self.settle(&conv, Side::To, raw, self.from_percent);
                }
            }
            Target::Both => {
                if !cfg.from_fixed && !cfg.to_fixed {
                    self.drag_both(&conv);
                }
            }
            Target::BothOne => {
                if !cfg.from_fixed && !cfg.to_fixed {
                    self.drag_both_one(&conv, fake_to_real(handle_x, hp));
                }
            }
            Target::None | Target::Click => {}
        }

        self.update_fakes();
        self.update_bar(cfg);
        self.write_result(cfg, fmt)
    }

    /// Pointer went down: pick the target and capture the pointer gaps.
    pub fn grab(&mut self, cfg: &Config, hint: Option<HandleHint>, pointer_x: f64) {
        self.pointer_x = pointer_x;
        self.calc_pointer_percent();

        let hp = self.handle_percent;
        let target = match hint.and_then(|h| h.target(cfg)) {
            Some(t) => t,
            None => {
                let x = (self.pointer_percent - hp / 2.0).clamp(0.0, (100.0 - hp).max(0.0));
                self.choose_handle(cfg, fake_to_real(x, hp))
            }
        };
        if target == Target::Both {
            self.tighten_min_interval();
        }
        self.target = target;
        self.capture_gap(target);
        self.is_active = true;
        self.dragging = true;
    }

    /// One-shot click on the track (`on_bar == false`) or the bar.
    pub fn click(&mut self, pointer_x: f64, on_bar: bool) {
        self.target = Target::Click;
        self.click_on_bar = on_bar;
        self.pointer_x = pointer_x.round();
    }

    /// Place the pointer exactly one step away from the targeted handle.
    pub fn prepare_key_step(&mut self, cfg: &Config, dir: KeyDirection) -> Result<()> {
        let p_step = Converter::new(cfg).step_percent()?;
        let hp = self.handle_percent;

        let target = match self.target {
            t @ (Target::Single | Target::From | Target::To | Target::Both) => t,
            Target::BothOne => {
                self.gap_left = 0.0;
                self.gap_right = self.to_fake - self.from_fake;
                Target::Both
            }
            Target::None | Target::Base | Target::Click => {
                self.gap = 0.0;
                if cfg.is_double() {
                    Target::From
                } else {
                    Target::Single
                }
            }
        };
        let anchor = match target {
            Target::Single => self.single_fake + self.gap,
            Target::From => self.from_fake + self.gap,
            Target::To => self.to_fake + self.gap,
            _ => self.from_fake + self.gap_left,
        };

        self.target = target;
        self.pointer_percent = anchor + real_to_fake(p_step, hp) * dir.sign();
        self.pointer_x = self.track_width * self.pointer_percent / 100.0;
        Ok(())
    }

    /// Target the default handle without moving it.
    pub fn focus_default_handle(&mut self, cfg: &Config) {
        let hp = self.handle_percent;
        let (target, fake) = if cfg.is_double() {
            (Target::From, self.from_fake)
        } else {
            (Target::Single, self.single_fake)
        };
        self.target = target;
        self.gap = hp / 2.0;
        self.pointer_percent = fake + hp / 2.0;
        self.pointer_x = self.track_width * self.pointer_percent / 100.0;
    }

    /// Pointer released.
    pub fn release(&mut self) {
        self.is_active = false;
        self.restore_min_interval();
    }

    /// Hold `min_interval` at the current span for the length of a `Both` drag.
    pub fn tighten_min_interval(&mut self) {
        self.min_interval_override = Some(self.data.to - self.data.from);
    }

    pub fn restore_min_interval(&mut self) {
        self.min_interval_override = None;
    }

    pub fn min_interval(&self, cfg: &Config) -> f64 {
        self.min_interval_override.unwrap_or(cfg.min_interval)
    }

    fn calc_pointer_percent(&mut self) {
        if self.track_width <= 0.0 {
            self.pointer_percent = 0.0;
            return;
        }
        let x = if self.pointer_x.is_nan() || self.pointer_x < 0.0 {
            0.0
        } else if self.pointer_x > self.track_width {
            self.track_width
        } else {
            self.pointer_x
        };
        self.pointer_percent = to_fixed(x / self.track_width * 100.0, DEFAULT_PRECISION);
    }

    /// Left edge of the dragged handle in fake percent.
    fn handle_x(&self) -> f64 {
        let max = (100.0 - self.handle_percent).max(0.0);
        let x = to_fixed(self.pointer_percent - self.gap, DEFAULT_PRECISION);
        x.clamp(0.0, max)
    }

    /// Closer handle to `real_x`; `to` wins at the midpoint and a fixed
    /// handle yields to the other.
    fn choose_handle(&self, cfg: &Config, real_x: f64) -> Target {
        if !cfg.is_double() {
            return Target::Single;
        }
        let mid = self.from_percent + (self.to_percent - self.from_percent) / 2.0;
        if real_x >= mid {
            if cfg.to_fixed {
                Target::From
            } else {
                Target::To
            }
        } else if cfg.from_fixed {
            Target::To
        } else {
            Target::From
        }
    }

    fn capture_gap(&mut self, target: Target) {
        let pointer = self.pointer_percent;
        match target {
            Target::Single => {
                self.gap = to_fixed(pointer - self.single_fake, DEFAULT_PRECISION);
            }
            Target::From => {
                self.gap = to_fixed(pointer - self.from_fake, DEFAULT_PRECISION);
                self.on_top = Some(HandleHint::From);
            }
            Target::To => {
                self.gap = to_fixed(pointer - self.to_fake, DEFAULT_PRECISION);
                self.on_top = Some(HandleHint::To);
            }
            Target::Both => {
                self.gap = 0.0;
                self.gap_left = to_fixed(pointer - self.from_fake, DEFAULT_PRECISION);
                self.gap_right = to_fixed(self.to_fake - pointer, DEFAULT_PRECISION);
                self.on_top = None;
            }
            _ => {}
        }
    }

    /// Quantize, clamp against the other handle, window, then intervals.
    fn settle(&self, conv: &Converter<'_>, side: Side, raw: f64, other: f64) -> f64 {
        let cfg = conv.config();
        let mut p = conv.quantize_to_step(raw);
        p = match side {
            Side::From => p.min(other),
            Side::To => p.max(other),
        };
        p = match side {
            Side::From => conv.clamp_to_window(p, cfg.from_min, cfg.from_max),
            Side::To => conv.clamp_to_window(p, cfg.to_min, cfg.to_max),
        };
        p = self.check_min_interval(conv, side, p, other);
        p = check_max_interval(conv, side, p, other);
        match side {
            Side::From => p.max(0.0).min(other),
            Side::To => p.min(100.0).max(other),
        }
    }

    fn check_min_interval(&self, conv: &Converter<'_>, side: Side, p: f64, other: f64) -> f64 {
        let min_interval = self.min_interval(conv.config());
        if min_interval <= 0.0 {
            return p;
        }
        let decimals = conv.precision();
        let current = conv.to_value(p);
        let next = conv.to_value(other);
        let adjusted = match side {
            Side::From if to_fixed(next - current, decimals) < min_interval => next - min_interval,
            Side::To if to_fixed(current - next, decimals) < min_interval => next + min_interval,
            _ => return p,
        };
        conv.percent_or_zero(to_fixed(adjusted, decimals))
    }

    fn drag_both(&mut self, conv: &Converter<'_>) {
        let cfg = conv.config();
        let hp = self.handle_percent;
        let raw_from = fake_to_real(self.pointer_percent - self.gap_left, hp);
        let raw_to = fake_to_real(self.pointer_percent + self.gap_right, hp);

        let from = conv.clamp_to_window(conv.quantize_to_step(raw_from), cfg.from_min, cfg.from_max);
        let to = conv.clamp_to_window(conv.quantize_to_step(raw_to), cfg.to_min, cfg.to_max);

        // Check each side against the other's new position so the pair moves
        // together instead of one handle lagging a pass behind.
        let from = self.check_min_interval(conv, Side::From, from, to);
        let from = check_max_interval(conv, Side::From, from, to).max(0.0).min(to);
        let to = self.check_min_interval(conv, Side::To, to, from);
        let to = check_max_interval(conv, Side::To, to, from).min(100.0).max(from);

        self.from_percent = from;
        self.to_percent = to;
    }

    fn drag_both_one(&mut self, conv: &Converter<'_>, real_x: f64) {
        let cfg = conv.config();
        let full = self.to_percent - self.from_percent;
        let half = full / 2.0;

        let mut new_from = real_x - half;
        let mut new_to = real_x + half;
        if new_from < 0.0 {
            new_from = 0.0;
            new_to = full;
        }
        if new_to > 100.0 {
            new_to = 100.0;
            new_from = 100.0 - full;
        }

        let from = conv.clamp_to_window(conv.quantize_to_step(new_from), cfg.from_min, cfg.from_max);
        let to = conv.clamp_to_window(conv.quantize_to_step(new_to), cfg.to_min, cfg.to_max);
        self.from_percent = from.min(to);
        self.to_percent = to.max(from);
    }

    fn recalc_base(&mut self, conv: &Converter<'_>, cfg: &Config) {
        let from = conv.percent_or_zero(self.data.from);
        if cfg.is_double() {
            let to = conv.percent_or_zero(self.data.to);
            self.from_percent = conv.clamp_to_window(from, cfg.from_min, cfg.from_max);
            self.to_percent = conv.clamp_to_window(to, cfg.to_min, cfg.to_max);
        } else {
            self.single_percent = conv.clamp_to_window(from, cfg.from_min, cfg.from_max);
        }
        self.update_fakes();
    }

    fn update_fakes(&mut self) {
        let hp = self.handle_percent;
        self.single_fake = real_to_fake(self.single_percent, hp);
        self.from_fake = real_to_fake(self.from_percent, hp);
        self.to_fake = real_to_fake(self.to_percent, hp);
    }

    fn update_bar(&mut self, cfg: &Config) {
        let hp = self.handle_percent;
        self.bar = if cfg.is_double() {
            Span {
                left: to_fixed(self.from_fake + hp / 2.0, DEFAULT_PRECISION),
                width: to_fixed(self.to_fake - self.from_fake, DEFAULT_PRECISION),
            }
        } else {
            Span {
                left: 0.0,
                width: to_fixed(self.single_fake + hp / 2.0, DEFAULT_PRECISION),
            }
        };
        // A `from` parked at the far end must stay reachable above `to`.
        if cfg.is_double() && self.from_percent >= 100.0 {
            self.on_top = Some(HandleHint::From);
        }
    }

    fn write_result(&mut self, cfg: &Config, fmt: &Formatter) -> Result<()> {
        let conv = Converter::new(cfg);
        let pretty = |v: f64| -> Result<String> {
            if cfg.has_values() {
                Ok(cfg.pretty_value(v)?.to_string())
            } else {
                Ok(fmt.prettify(cfg, v))
            }
        };
        let custom = |v: f64| -> Result<Option<crate::config::CustomValue>> {
            if cfg.has_values() {
                Ok(Some(cfg.custom_value(v)?.clone()))
            } else {
                Ok(None)
            }
        };

        let d = &mut self.data;
        d.min = cfg.min;
        d.max = cfg.max;
        d.min_pretty = pretty(cfg.min)?;
        d.max_pretty = pretty(cfg.max)?;

        if cfg.is_double() {
            d.from_percent = self.from_percent;
            d.to_percent = self.to_percent;
            d.from = conv.to_value(self.from_percent);
            d.to = conv.to_value(self.to_percent);
        } else {
            d.from_percent = self.single_percent;
            d.from = conv.to_value(self.single_percent);
            d.to_percent = conv.percent_or_zero(d.to);
        }

        d.from_pretty = pretty(d.from)?;
        d.to_pretty = pretty(d.to)?;
        d.from_value = custom(d.from)?;
        d.to_value = custom(d.to)?;
        Ok(())
    }
}
