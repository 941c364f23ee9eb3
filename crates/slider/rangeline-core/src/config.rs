//! Slider configuration records.
//!
//! `Config` is the fully resolved, internally consistent configuration a
//! slider runs with. `PartialConfig` is what callers hand in: every field is
//! optional and numeric fields also accept numeric-looking strings, since the
//! values often come straight from markup attributes or an input's value.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SliderError};
use crate::format::number_to_string;

/// Single handle or a `from`/`to` pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderType {
    #[default]
    Single,
    Double,
}

/// One entry of an explicit value list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Number(f64),
    Label(String),
}

impl CustomValue {
    /// Numeric-looking labels become numbers; everything else passes through.
    pub fn normalized(self) -> Self {
        match self {
            CustomValue::Label(s) => match parse_numeric(&s) {
                Some(n) => CustomValue::Number(n),
                None => CustomValue::Label(s),
            },
            other => other,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CustomValue::Number(n) => Some(*n),
            CustomValue::Label(_) => None,
        }
    }
}

impl std::fmt::Display for CustomValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomValue::Number(n) => f.write_str(&number_to_string(*n)),
            CustomValue::Label(s) => f.write_str(s),
        }
    }
}

/// A number or a string that should be read as one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Empty strings read as `0`, anything unparseable as `NaN`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => {
                if s.trim().is_empty() {
                    0.0
                } else {
                    parse_numeric(s).unwrap_or(f64::NAN)
                }
            }
        }
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        Numeric::Number(v)
    }
}

impl From<&str> for Numeric {
    fn from(v: &str) -> Self {
        Numeric::Text(v.to_string())
    }
}

pub(crate) fn parse_numeric(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Resolved configuration for one slider session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "type")]
    pub slider_type: SliderType,

    pub min: f64,
    pub max: f64,
    pub from: f64,
    pub to: f64,
    pub step: f64,

    pub min_interval: f64,
    pub max_interval: f64,
    pub drag_interval: bool,

    pub values: Vec<CustomValue>,
    /// Display strings parallel to `values`.
    #[serde(skip)]
    pub pretty_values: Vec<String>,

    pub from_fixed: bool,
    pub from_min: Option<f64>,
    pub from_max: Option<f64>,
    pub from_shadow: bool,

    pub to_fixed: bool,
    pub to_min: Option<f64>,
    pub to_max: Option<f64>,
    pub to_shadow: bool,

    pub prettify_enabled: bool,
    pub prettify_separator: String,

    pub force_edges: bool,
    pub keyboard: bool,

    pub grid: bool,
    pub grid_margin: bool,
    pub grid_num: f64,
    pub grid_snap: bool,

    pub hide_min_max: bool,
    pub hide_from_to: bool,

    pub prefix: String,
    pub postfix: String,
    pub max_postfix: String,
    pub decorate_both: bool,
    pub values_separator: String,
    pub input_values_separator: String,

    pub disable: bool,
    pub block: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slider_type: SliderType::Single,
            min: 10.0,
            max: 100.0,
            from: 10.0,
            to: 100.0,
            step: 1.0,
            min_interval: 0.0,
            max_interval: 0.0,
            drag_interval: false,
            values: Vec::new(),
            pretty_values: Vec::new(),
            from_fixed: false,
            from_min: None,
            from_max: None,
            from_shadow: false,
            to_fixed: false,
            to_min: None,
            to_max: None,
            to_shadow: false,
            prettify_enabled: true,
            prettify_separator: " ".to_string(),
            force_edges: false,
            keyboard: true,
            grid: false,
            grid_margin: true,
            grid_num: 4.0,
            grid_snap: false,
            hide_min_max: false,
            hide_from_to: false,
            prefix: String::new(),
            postfix: String::new(),
            max_postfix: String::new(),
            decorate_both: true,
            values_separator: " — ".to_string(),
            input_values_separator: ";".to_string(),
            disable: false,
            block: false,
        }
    }
}

impl Config {
    /// Defaults with `from`/`to` left unset, used as the base for a brand new
    /// slider so that they fall back to the merged `min`/`max`.
    pub fn unresolved() -> Self {
        Self {
            from: f64::NAN,
            to: f64::NAN,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        self.slider_type == SliderType::Double
    }

    #[inline]
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Interaction is switched off entirely.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.disable || self.block
    }

    fn value_index(&self, index: f64) -> Result<usize> {
        if self.values.is_empty() {
            return Err(SliderError::NoCustomValues);
        }
        if index < 0.0 {
            return Err(SliderError::NegativeIndex { index });
        }
        let len = self.values.len();
        if !index.is_finite() || index.round() as usize >= len {
            return Err(SliderError::IndexOutOfRange { index, len });
        }
        Ok(index.round() as usize)
    }

    /// Custom value at a domain index.
    pub fn custom_value(&self, index: f64) -> Result<&CustomValue> {
        let i = self.value_index(index)?;
        Ok(&self.values[i])
    }

    /// Prettified custom value at a domain index.
    pub fn pretty_value(&self, index: f64) -> Result<&str> {
        let i = self.value_index(index)?;
        self.pretty_values
            .get(i)
            .map(String::as_str)
            .ok_or(SliderError::IndexOutOfRange {
                index,
                len: self.pretty_values.len(),
            })
    }

    /// Index of the custom value whose text matches `token`.
    pub fn position_of(&self, token: &str) -> Option<usize> {
        self.values.iter().position(|v| v.to_string() == token)
    }
}

/// Caller-supplied configuration; unset fields keep the base value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    #[serde(rename = "type")]
    pub slider_type: Option<SliderType>,

    pub min: Option<Numeric>,
    pub max: Option<Numeric>,
    pub from: Option<Numeric>,
    pub to: Option<Numeric>,
    pub step: Option<Numeric>,

    pub min_interval: Option<Numeric>,
    pub max_interval: Option<Numeric>,
    pub drag_interval: Option<bool>,

    pub values: Option<Vec<CustomValue>>,

    pub from_fixed: Option<bool>,
    pub from_min: Option<Numeric>,
    pub from_max: Option<Numeric>,
    pub from_shadow: Option<bool>,

    pub to_fixed: Option<bool>,
    pub to_min: Option<Numeric>,
    pub to_max: Option<Numeric>,
    pub to_shadow: Option<bool>,

    pub prettify_enabled: Option<bool>,
    pub prettify_separator: Option<String>,

    pub force_edges: Option<bool>,
    pub keyboard: Option<bool>,

    pub grid: Option<bool>,
    pub grid_margin: Option<bool>,
    pub grid_num: Option<Numeric>,
    pub grid_snap: Option<bool>,

    pub hide_min_max: Option<bool>,
    pub hide_from_to: Option<bool>,

    pub prefix: Option<String>,
    pub postfix: Option<String>,
    pub max_postfix: Option<String>,
    pub decorate_both: Option<bool>,
    pub values_separator: Option<String>,
    pub input_values_separator: Option<String>,

    pub disable: Option<bool>,
    pub block: Option<bool>,

    /// Initial value string of the bound input (`"from;to"` in double mode).
    pub input_value: Option<String>,
}

impl PartialConfig {
    /// Parse a JSON object into a partial configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Positions before an external `update()`, used to decide which handle
/// yields when the new configuration crosses `from` and `to`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateHint {
    pub from: f64,
    pub to: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(Numeric::from("12.5").to_f64(), 12.5);
        assert_eq!(Numeric::from("  ").to_f64(), 0.0);
        assert!(Numeric::from("abc").to_f64().is_nan());
        assert_eq!(Numeric::from(3.0).to_f64(), 3.0);
    }

    #[test]
    fn partial_accepts_strings_and_numbers() {
        let p = PartialConfig::from_json(r#"{"type":"double","min":"0","max":50,"values":["a",2]}"#)
            .unwrap();
        assert_eq!(p.slider_type, Some(SliderType::Double));
        assert_eq!(p.min.unwrap().to_f64(), 0.0);
        assert_eq!(p.max.unwrap().to_f64(), 50.0);
        assert_eq!(
            p.values.unwrap(),
            vec![CustomValue::Label("a".into()), CustomValue::Number(2.0)]
        );
    }

    #[test]
    fn custom_value_lookup_errors() {
        let mut cfg = Config::default();
        assert_eq!(cfg.custom_value(0.0), Err(SliderError::NoCustomValues));

        cfg.values = vec![CustomValue::Label("a".into()), CustomValue::Label("b".into())];
        assert_eq!(
            cfg.custom_value(-1.0),
            Err(SliderError::NegativeIndex { index: -1.0 })
        );
        assert_eq!(
            cfg.custom_value(2.0),
            Err(SliderError::IndexOutOfRange { index: 2.0, len: 2 })
        );
        assert_eq!(cfg.custom_value(1.0), Ok(&CustomValue::Label("b".into())));
    }

    #[test]
    fn labels_that_look_numeric_normalize() {
        assert_eq!(
            CustomValue::Label("1000".into()).normalized(),
            CustomValue::Number(1000.0)
        );
        assert_eq!(
            CustomValue::Label("Jan".into()).normalized(),
            CustomValue::Label("Jan".into())
        );
    }
}
