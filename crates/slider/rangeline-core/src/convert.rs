//! Value/percent conversions.
//!
//! Two percentage spaces are in play:
//! - real percent: 0..100 over the full track, independent of handle width;
//! - fake percent: 0..100 over the track minus one handle width, which is
//!   what positions a handle so that it never overflows the track.
//!
//! Everything here is pure and parameterized by the active [`Config`].

use crate::config::Config;
use crate::error::{Result, SliderError};
use crate::format::number_to_string;

/// Precision used to scrub binary floating point noise; effectively a no-op
/// for values of ordinary magnitude.
pub const DEFAULT_PRECISION: u32 = 20;

const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Round to `decimals` places, halves away from zero. Numbers whose scaled
/// form no longer fits an exact integer are returned unchanged, since they
/// carry no more precision than requested anyway.
pub fn to_fixed(num: f64, decimals: u32) -> f64 {
    if !num.is_finite() {
        return num;
    }
    let p = POW10[decimals.min(22) as usize];
    let scaled = num * p;
    if scaled.abs() >= MAX_EXACT_INT {
        return num;
    }
    let r = scaled.round() / p;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Round to nearest, halves towards positive infinity.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Number of fractional digits in the shortest decimal text of `n`.
pub fn decimals_of(n: f64) -> u32 {
    number_to_string(n)
        .split_once('.')
        .map(|(_, frac)| frac.len() as u32)
        .unwrap_or(0)
}

/// Real percent to fake percent for a handle `handle_percent` wide.
#[inline]
pub fn real_to_fake(real: f64, handle_percent: f64) -> f64 {
    let full = 100.0 - handle_percent;
    real / 100.0 * full
}

/// Fake percent back to real percent.
#[inline]
pub fn fake_to_real(fake: f64, handle_percent: f64) -> f64 {
    let full = 100.0 - handle_percent;
    if full <= 0.0 {
        return 0.0;
    }
    fake / full * 100.0
}

/// Conversions bound to one configuration.
#[derive(Clone, Copy, Debug)]
pub struct Converter<'a> {
    cfg: &'a Config,
}

impl<'a> Converter<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn config(&self) -> &'a Config {
        self.cfg
    }

    /// Domain value to real percent. With `domain_only` the value is treated
    /// as a distance (no `min` offset), which is how the step becomes a
    /// percentage.
    pub fn to_percent(&self, value: f64, domain_only: bool) -> Result<f64> {
        let diapason = self.cfg.max - self.cfg.min;
        if diapason == 0.0 {
            return Err(SliderError::ZeroWidthDomain {
                value: self.cfg.min,
            });
        }
        let val = if domain_only {
            value
        } else {
            value - self.cfg.min
        };
        Ok(to_fixed(val / (diapason / 100.0), DEFAULT_PRECISION))
    }

    /// [`Self::to_percent`] with a zero-width domain mapped to `0`.
    #[inline]
    pub fn percent_or_zero(&self, value: f64) -> f64 {
        self.to_percent(value, false).unwrap_or(0.0)
    }

    /// Decimal places implied by the `min`, `max` and `step` literals.
    pub fn precision(&self) -> u32 {
        decimals_of(self.cfg.min)
            .max(decimals_of(self.cfg.max))
            .max(decimals_of(self.cfg.step))
    }

    /// Real percent to domain value. The extremities map exactly onto
    /// `min`/`max`; everything else is rounded to [`Self::precision`].
    pub fn to_value(&self, percent: f64) -> f64 {
        let cfg = self.cfg;
        if percent == 0.0 {
            return cfg.min;
        }
        if percent == 100.0 {
            return cfg.max;
        }

        let bounds_decimals = decimals_of(cfg.min).max(decimals_of(cfg.max));
        let decimals = self.precision();

        let mut min = cfg.min;
        let mut max = cfg.max;
        let mut shift = 0.0;
        if min < 0.0 {
            // Work in a non-negative space to keep precision around zero.
            shift = min.abs();
            min = to_fixed(min + shift, bounds_decimals);
            max = to_fixed(max + shift, bounds_decimals);
        }

        let mut number = to_fixed((max - min) / 100.0 * percent + min, decimals);
        if shift != 0.0 {
            number = to_fixed(number - shift, decimals);
        }

        if number < cfg.min {
            cfg.min
        } else if number > cfg.max {
            cfg.max
        } else {
            number
        }
    }

    /// The step expressed as a real percent.
    #[inline]
    pub fn step_percent(&self) -> Result<f64> {
        self.to_percent(self.cfg.step, true)
    }

    /// Snap a real percent onto the step grid. Exactly `100` stays `100`
    /// even when the step does not divide the range.
    pub fn quantize_to_step(&self, percent: f64) -> f64 {
        let p_step = match self.step_percent() {
            Ok(p) if p > 0.0 => p,
            _ => return 0.0,
        };
        let mut rounded = round_half_up(percent / p_step) * p_step;
        if rounded > 100.0 || percent == 100.0 {
            rounded = 100.0;
        }
        to_fixed(rounded, DEFAULT_PRECISION)
    }

    /// Clamp a real percent, via value space, into `[lo, hi]`. Unset or
    /// non-finite bounds fall back to `min`/`max`.
    pub fn clamp_to_window(&self, percent: f64, lo: Option<f64>, hi: Option<f64>) -> f64 {
        let lo = lo.filter(|v| v.is_finite()).unwrap_or(self.cfg.min);
        let hi = hi.filter(|v| v.is_finite()).unwrap_or(self.cfg.max);
        let mut num = self.to_value(percent);
        if num < lo {
            num = lo;
        }
        if num > hi {
            num = hi;
        }
        self.percent_or_zero(num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(min: f64, max: f64, step: f64) -> Config {
        Config {
            min,
            max,
            from: min,
            to: max,
            step,
            ..Config::default()
        }
    }

    #[test]
    fn to_fixed_rounds_half_away_from_zero() {
        assert_eq!(to_fixed(2.5, 0), 3.0);
        assert_eq!(to_fixed(-2.5, 0), -3.0);
        assert_eq!(to_fixed(0.1 + 0.2, 2), 0.3);
        assert_eq!(to_fixed(33.333333333333336, DEFAULT_PRECISION), 33.333333333333336);
    }

    #[test]
    fn decimals() {
        assert_eq!(decimals_of(1.0), 0);
        assert_eq!(decimals_of(0.25), 2);
        assert_eq!(decimals_of(-10.125), 3);
    }

    #[test]
    fn extremities_are_exact() {
        let c = cfg(0.1, 0.7, 0.1);
        let conv = Converter::new(&c);
        assert_eq!(conv.to_value(0.0), 0.1);
        assert_eq!(conv.to_value(100.0), 0.7);
    }

    #[test]
    fn zero_width_domain_fails() {
        let c = cfg(5.0, 5.0, 1.0);
        let conv = Converter::new(&c);
        assert_eq!(
            conv.to_percent(5.0, false),
            Err(SliderError::ZeroWidthDomain { value: 5.0 })
        );
        assert_eq!(conv.percent_or_zero(5.0), 0.0);
        assert_eq!(conv.quantize_to_step(40.0), 0.0);
    }

    #[test]
    fn step_grid_round_trips() {
        for (min, max, step) in [
            (0.0, 100.0, 1.0),
            (10.0, 100.0, 5.0),
            (-100.0, -50.0, 1.0),
            (0.0, 1.0, 0.1),
            (-1.5, 2.5, 0.25),
            (1000.0, 100_000.0, 500.0),
        ] {
            let c = cfg(min, max, step);
            let conv = Converter::new(&c);
            let steps = ((max - min) / step).round() as i64;
            for k in 0..=steps {
                let v = to_fixed(min + k as f64 * step, conv.precision());
                let back = conv.to_value(conv.to_percent(v, false).unwrap());
                assert_eq!(back, v, "min={min} max={max} step={step} k={k}");
            }
        }
    }

    #[test]
    fn negative_domain_precision() {
        let c = cfg(-1.0, 1.0, 0.1);
        let conv = Converter::new(&c);
        assert_eq!(conv.to_value(55.0), 0.1);
        assert_eq!(conv.to_value(45.0), -0.1);
        assert_eq!(conv.to_value(50.0), 0.0);
    }

    #[test]
    fn quantize_snaps_and_keeps_hundred() {
        let c = cfg(0.0, 10.0, 3.0);
        let conv = Converter::new(&c);
        // step 3 over a range of 10 is 30%
        assert_eq!(conv.quantize_to_step(14.0), 0.0);
        assert_eq!(conv.quantize_to_step(16.0), 30.0);
        assert_eq!(conv.quantize_to_step(99.0), 90.0);
        assert_eq!(conv.quantize_to_step(100.0), 100.0);
    }

    #[test]
    fn fake_real_round_trip() {
        for hp in [0.0, 2.5, 7.0, 33.0] {
            for x in [0.0, 12.5, 50.0, 99.0, 100.0 - hp] {
                let back = real_to_fake(fake_to_real(x, hp), hp);
                assert!((back - x).abs() < 1e-9, "hp={hp} x={x} back={back}");
            }
        }
        assert_eq!(real_to_fake(100.0, 4.0), 96.0);
        assert_eq!(fake_to_real(96.0, 4.0), 100.0);
    }

    #[test]
    fn window_clamp() {
        let c = cfg(0.0, 100.0, 1.0);
        let conv = Converter::new(&c);
        assert_eq!(conv.clamp_to_window(10.0, Some(20.0), Some(80.0)), 20.0);
        assert_eq!(conv.clamp_to_window(90.0, Some(20.0), Some(80.0)), 80.0);
        assert_eq!(conv.clamp_to_window(50.0, None, Some(f64::NAN)), 50.0);
    }
}
