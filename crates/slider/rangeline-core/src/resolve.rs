//! Configuration resolution: merge a [`PartialConfig`] over a base
//! [`Config`] and normalize the result into a consistent configuration.

use log::{debug, warn};

use crate::config::{Config, CustomValue, Numeric, PartialConfig, UpdateHint};
use crate::error::{Result, SliderError};
use crate::format::Formatter;

fn pick<T: Clone>(base: &T, over: &Option<T>) -> T {
    over.as_ref().unwrap_or(base).clone()
}

fn pick_num(base: f64, over: &Option<Numeric>) -> f64 {
    over.as_ref().map(Numeric::to_f64).unwrap_or(base)
}

fn pick_window(base: Option<f64>, over: &Option<Numeric>) -> Option<f64> {
    match over {
        Some(n) => Some(n.to_f64()).filter(|v| v.is_finite()),
        None => base,
    }
}

/// Shallow merge with string coercion; no normalization yet.
fn merge(base: &Config, p: &PartialConfig) -> Config {
    let mut min = pick_num(base.min, &p.min);
    if !min.is_finite() {
        warn!("ignoring non-numeric min, keeping {}", base.min);
        min = base.min;
    }
    let mut max = pick_num(base.max, &p.max);
    if !max.is_finite() {
        warn!("ignoring non-numeric max, keeping {}", base.max);
        max = base.max;
    }

    Config {
        slider_type: pick(&base.slider_type, &p.slider_type),
        min,
        max,
        from: pick_num(base.from, &p.from),
        to: pick_num(base.to, &p.to),
        step: pick_num(base.step, &p.step),
        min_interval: pick_num(base.min_interval, &p.min_interval),
        max_interval: pick_num(base.max_interval, &p.max_interval),
        drag_interval: pick(&base.drag_interval, &p.drag_interval),
        values: p
            .values
            .clone()
            .unwrap_or_else(|| base.values.clone())
            .into_iter()
            .map(CustomValue::normalized)
            .collect(),
        pretty_values: Vec::new(),
        from_fixed: pick(&base.from_fixed, &p.from_fixed),
        from_min: pick_window(base.from_min, &p.from_min),
        from_max: pick_window(base.from_max, &p.from_max),
        from_shadow: pick(&base.from_shadow, &p.from_shadow),
        to_fixed: pick(&base.to_fixed, &p.to_fixed),
        to_min: pick_window(base.to_min, &p.to_min),
        to_max: pick_window(base.to_max, &p.to_max),
        to_shadow: pick(&base.to_shadow, &p.to_shadow),
        prettify_enabled: pick(&base.prettify_enabled, &p.prettify_enabled),
        prettify_separator: pick(&base.prettify_separator, &p.prettify_separator),
        force_edges: pick(&base.force_edges, &p.force_edges),
        keyboard: pick(&base.keyboard, &p.keyboard),
        grid: pick(&base.grid, &p.grid),
        grid_margin: pick(&base.grid_margin, &p.grid_margin),
        grid_num: pick_num(base.grid_num, &p.grid_num),
        grid_snap: pick(&base.grid_snap, &p.grid_snap),
        hide_min_max: pick(&base.hide_min_max, &p.hide_min_max),
        hide_from_to: pick(&base.hide_from_to, &p.hide_from_to),
        prefix: pick(&base.prefix, &p.prefix),
        postfix: pick(&base.postfix, &p.postfix),
        max_postfix: pick(&base.max_postfix, &p.max_postfix),
        decorate_both: pick(&base.decorate_both, &p.decorate_both),
        values_separator: pick(&base.values_separator, &p.values_separator),
        input_values_separator: pick(&base.input_values_separator, &p.input_values_separator),
        disable: pick(&base.disable, &p.disable),
        block: pick(&base.block, &p.block),
    }
}

/// Read `from`/`to` out of the bound input's value string.
fn apply_input_value(cfg: &mut Config, raw: &str) -> Result<()> {
    let tokens: Vec<&str> = raw.split(cfg.input_values_separator.as_str()).collect();
    if cfg.is_double() && tokens.len() < 2 {
        return Err(SliderError::InputValueTokens {
            value: raw.to_string(),
            separator: cfg.input_values_separator.clone(),
        });
    }

    let read = |token: &str| -> Option<f64> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if cfg.has_values() {
            if let Some(i) = cfg.position_of(token) {
                return Some(i as f64);
            }
        }
        crate::config::parse_numeric(token)
    };

    let from = tokens.first().and_then(|t| read(t));
    let to = tokens.get(1).and_then(|t| read(t));
    if let Some(f) = from {
        cfg.from = f;
    }
    if let Some(t) = to {
        cfg.to = t;
    }
    Ok(())
}

fn clamp_into(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

fn normalize_interval(v: f64, span: f64) -> f64 {
    if !v.is_finite() || v <= 0.0 {
        0.0
    } else if v > span {
        span
    } else {
        v
    }
}

/// Merge `partial` over `base` and normalize.
///
/// `hint` carries the positions from before an external update; when the new
/// `from`/`to` cross, the handle that kept its hinted position yields to the
/// one that moved. Without a usable hint crossed inputs are swapped.
pub fn resolve(base: &Config, partial: &PartialConfig, hint: Option<UpdateHint>) -> Result<Config> {
    let mut cfg = merge(base, partial);

    if cfg.has_values() {
        cfg.min = 0.0;
        cfg.max = (cfg.values.len() - 1) as f64;
        cfg.step = 1.0;
        cfg.grid_num = cfg.max;
        cfg.grid_snap = true;
        cfg.pretty_values = Formatter::new().pretty_values(&cfg);
    }

    if let Some(raw) = partial.input_value.as_deref().filter(|s| !s.is_empty()) {
        apply_input_value(&mut cfg, raw)?;
    }

    if cfg.max < cfg.min {
        cfg.max = cfg.min;
    }

    if !cfg.from.is_finite() {
        cfg.from = cfg.min;
    }
    if !cfg.to.is_finite() {
        cfg.to = cfg.max;
    }

    cfg.from = clamp_into(cfg.from, cfg.min, cfg.max);
    cfg.to = clamp_into(cfg.to, cfg.min, cfg.max);
    if cfg.is_double() {
        let from_kept = hint.map(|h| h.from == cfg.from);
        let to_kept = hint.map(|h| h.to == cfg.to);
        match (from_kept, to_kept) {
            (Some(true), Some(false)) => {
                if cfg.from > cfg.to {
                    cfg.from = cfg.to;
                }
            }
            (Some(false), Some(true)) => {
                if cfg.to < cfg.from {
                    cfg.to = cfg.from;
                }
            }
            _ => {
                if cfg.from > cfg.to {
                    std::mem::swap(&mut cfg.from, &mut cfg.to);
                }
            }
        }
        if cfg.from > cfg.to {
            cfg.from = cfg.to;
        }
    }

    if !cfg.step.is_finite() || cfg.step <= 0.0 {
        cfg.step = 1.0;
    }

    if let Some(lo) = cfg.from_min {
        if cfg.from < lo {
            cfg.from = lo;
        }
    }
    if let Some(hi) = cfg.from_max {
        if cfg.from > hi {
            cfg.from = hi;
        }
    }
    if let Some(lo) = cfg.to_min {
        if cfg.to < lo {
            cfg.to = lo;
        }
    }
    if let Some(hi) = cfg.to_max {
        if cfg.to > hi {
            cfg.to = hi;
        }
    }
    cfg.from = clamp_into(cfg.from, cfg.min, cfg.max);
    cfg.to = clamp_into(cfg.to, cfg.min, cfg.max);
    if cfg.is_double() && cfg.from > cfg.to {
        cfg.from = cfg.to;
    }

    let span = cfg.max - cfg.min;
    cfg.min_interval = normalize_interval(cfg.min_interval, span);
    cfg.max_interval = normalize_interval(cfg.max_interval, span);

    debug!(
        "resolved config: type={:?} min={} max={} from={} to={} step={}",
        cfg.slider_type, cfg.min, cfg.max, cfg.from, cfg.to, cfg.step
    );
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SliderType;

    fn partial(json: &str) -> PartialConfig {
        PartialConfig::from_json(json).unwrap()
    }

    fn fresh(json: &str) -> Result<Config> {
        resolve(&Config::unresolved(), &partial(json), None)
    }

    #[test]
    fn from_defaults_to_min() {
        let cfg = fresh(r#"{"min":10,"max":100,"type":"single"}"#).unwrap();
        assert_eq!(cfg.from, 10.0);
        assert_eq!(cfg.to, 100.0);
        assert_eq!(cfg.slider_type, SliderType::Single);
    }

    #[test]
    fn crossed_inputs_are_corrected() {
        let cfg = fresh(r#"{"min":-100,"max":-50,"from":-50,"to":-100,"type":"double"}"#).unwrap();
        assert_eq!((cfg.from, cfg.to), (-100.0, -50.0));
    }

    #[test]
    fn max_below_min_is_raised() {
        let cfg = fresh(r#"{"min":20,"max":5}"#).unwrap();
        assert_eq!(cfg.max, 20.0);
        assert_eq!(cfg.from, 20.0);
    }

    #[test]
    fn custom_values_collapse_domain() {
        let cfg = fresh(r#"{"type":"double","values":["a","b","c"],"input_value":"0;2"}"#).unwrap();
        assert_eq!((cfg.min, cfg.max, cfg.step), (0.0, 2.0, 1.0));
        assert!(cfg.grid_snap);
        assert_eq!((cfg.from, cfg.to), (0.0, 2.0));
        assert_eq!(cfg.pretty_values, vec!["a", "b", "c"]);
    }

    #[test]
    fn input_value_matches_labels() {
        let cfg = fresh(r#"{"type":"double","values":["a","b","c"],"input_value":"b;c"}"#).unwrap();
        assert_eq!((cfg.from, cfg.to), (1.0, 2.0));
    }

    #[test]
    fn double_input_value_needs_two_tokens() {
        let err = fresh(r#"{"type":"double","input_value":"15"}"#).unwrap_err();
        assert!(matches!(err, SliderError::InputValueTokens { .. }));
        // Single mode is happy with one token.
        let cfg = fresh(r#"{"input_value":"15"}"#).unwrap();
        assert_eq!(cfg.from, 15.0);
    }

    #[test]
    fn invalid_step_becomes_one() {
        for step in ["0", "-2", "\"abc\""] {
            let cfg = fresh(&format!(r#"{{"step":{step}}}"#)).unwrap();
            assert_eq!(cfg.step, 1.0, "step={step}");
        }
    }

    #[test]
    fn windows_clamp_handles() {
        let cfg = fresh(
            r#"{"type":"double","min":0,"max":100,"from":5,"to":95,"from_min":10,"to_max":90}"#,
        )
        .unwrap();
        assert_eq!((cfg.from, cfg.to), (10.0, 90.0));
    }

    #[test]
    fn intervals_are_bounded_by_span() {
        let cfg = fresh(r#"{"type":"double","min":0,"max":10,"min_interval":50,"max_interval":-1}"#)
            .unwrap();
        assert_eq!(cfg.min_interval, 10.0);
        assert_eq!(cfg.max_interval, 0.0);
    }

    #[test]
    fn hint_decides_which_handle_yields() {
        let base = fresh(r#"{"type":"double","min":0,"max":100,"from":20,"to":60}"#).unwrap();
        let hint = Some(UpdateHint {
            from: 20.0,
            to: 60.0,
        });

        // `to` moved below the untouched `from`: `from` follows it down.
        let cfg = resolve(&base, &partial(r#"{"to":10}"#), hint).unwrap();
        assert_eq!((cfg.from, cfg.to), (10.0, 10.0));

        // `from` moved above the untouched `to`: `to` follows it up.
        let cfg = resolve(&base, &partial(r#"{"from":80}"#), hint).unwrap();
        assert_eq!((cfg.from, cfg.to), (80.0, 80.0));

        // Both moved and crossed: swapped.
        let cfg = resolve(&base, &partial(r#"{"from":70,"to":30}"#), hint).unwrap();
        assert_eq!((cfg.from, cfg.to), (30.0, 70.0));
    }

    #[test]
    fn string_fields_are_coerced() {
        let cfg = fresh(r#"{"min":"0","max":"1","step":"0.1","from":"0.3"}"#).unwrap();
        assert_eq!((cfg.min, cfg.max, cfg.step, cfg.from), (0.0, 1.0, 0.1, 0.3));
    }

    #[test]
    fn resolving_twice_is_stable() {
        let first = fresh(r#"{"type":"double","min":0,"max":50,"from":10,"to":40,"step":5}"#)
            .unwrap();
        let hint = Some(UpdateHint {
            from: first.from,
            to: first.to,
        });
        let second = resolve(&first, &PartialConfig::default(), hint).unwrap();
        assert_eq!(first, second);
    }
}
