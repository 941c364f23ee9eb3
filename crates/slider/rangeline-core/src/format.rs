//! Label text formatting: prettify (digit grouping or a custom closure) and
//! decoration (prefix, postfix, max postfix).

use crate::config::Config;
use crate::error::Result;

/// Custom prettify closure supplied by the host.
pub type PrettifyFn = Box<dyn Fn(f64) -> String>;

/// Shortest round-trip decimal text of a number (`10` rather than `10.0`).
pub fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{n}")
}

/// Insert `separator` between groups of three digits in the integer part.
pub fn group_digits(n: f64, separator: &str) -> String {
    let text = number_to_string(n);
    let (sign, rest) = match text.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 * separator.len());
    out.push_str(sign);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Formats values the way labels and the grid display them.
#[derive(Default)]
pub struct Formatter {
    custom: Option<PrettifyFn>,
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prettify(prettify: PrettifyFn) -> Self {
        Self {
            custom: Some(prettify),
        }
    }

    pub fn prettify(&self, cfg: &Config, n: f64) -> String {
        if !cfg.prettify_enabled {
            return number_to_string(n);
        }
        match &self.custom {
            Some(f) => f(n),
            None => group_digits(n, &cfg.prettify_separator),
        }
    }

    /// Display strings parallel to `cfg.values`.
    pub fn pretty_values(&self, cfg: &Config) -> Vec<String> {
        cfg.values
            .iter()
            .map(|v| match v.as_number() {
                Some(n) => self.prettify(cfg, n),
                None => v.to_string(),
            })
            .collect()
    }

    /// Wrap already prettified text with prefix/postfix. `original` is the raw
    /// number the text came from, used to detect the max value.
    pub fn decorate(&self, cfg: &Config, text: &str, original: Option<f64>) -> String {
        let mut out = String::with_capacity(text.len() + cfg.prefix.len() + cfg.postfix.len());
        out.push_str(&cfg.prefix);
        out.push_str(text);
        if !cfg.max_postfix.is_empty() {
            let at_max = if cfg.has_values() {
                cfg.pretty_values.last().map(String::as_str) == Some(text)
            } else {
                original == Some(cfg.max)
            };
            if at_max {
                out.push_str(&cfg.max_postfix);
                if !cfg.postfix.is_empty() {
                    out.push(' ');
                }
            }
        }
        out.push_str(&cfg.postfix);
        out
    }

    /// Label text for a domain value: the custom value when a list is set,
    /// otherwise the prettified number; decorated either way. With a list,
    /// `value` is an index and must address an entry.
    pub fn label(&self, cfg: &Config, value: f64) -> Result<String> {
        if cfg.has_values() {
            Ok(self.decorate(cfg, cfg.pretty_value(value)?, None))
        } else {
            let pretty = self.prettify(cfg, value);
            Ok(self.decorate(cfg, &pretty, Some(value)))
        }
    }
}
