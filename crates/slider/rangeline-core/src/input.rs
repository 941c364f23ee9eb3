//! Bound input value string and its auxiliary data attributes.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::events::SliderData;
use crate::format::number_to_string;

/// What the host writes back into its input element after every render and
/// before every lifecycle callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    /// `from` (single) or `from<sep>to` (double); custom values are written
    /// as their text.
    pub value: String,
    /// Plain decimal text for the `data-from` attribute.
    pub data_from: String,
    /// Plain decimal text for the `data-to` attribute; double mode only.
    pub data_to: Option<String>,
}

impl InputState {
    pub fn from_data(cfg: &Config, data: &SliderData) -> Self {
        let text = |n: f64, custom: &Option<crate::config::CustomValue>| match custom {
            Some(v) if cfg.has_values() => v.to_string(),
            _ => number_to_string(n),
        };

        let from = text(data.from, &data.from_value);
        if cfg.is_double() {
            let to = text(data.to, &data.to_value);
            Self {
                value: format!("{from}{}{to}", cfg.input_values_separator),
                data_from: number_to_string(data.from),
                data_to: Some(number_to_string(data.to)),
            }
        } else {
            Self {
                value: from,
                data_from: number_to_string(data.from),
                data_to: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomValue, SliderType};

    #[test]
    fn double_joins_with_separator() {
        let cfg = Config {
            slider_type: SliderType::Double,
            input_values_separator: "|".into(),
            ..Config::default()
        };
        let data = SliderData {
            from: 20.0,
            to: 45.5,
            ..SliderData::default()
        };
        let input = InputState::from_data(&cfg, &data);
        assert_eq!(input.value, "20|45.5");
        assert_eq!(input.data_from, "20");
        assert_eq!(input.data_to.as_deref(), Some("45.5"));
    }

    #[test]
    fn single_custom_value_writes_label() {
        let cfg = Config {
            values: vec![CustomValue::Label("x".into()), CustomValue::Label("y".into())],
            ..Config::default()
        };
        let data = SliderData {
            from: 1.0,
            from_value: Some(CustomValue::Label("y".into())),
            ..SliderData::default()
        };
        let input = InputState::from_data(&cfg, &data);
        assert_eq!(input.value, "y");
        assert_eq!(input.data_from, "1");
        assert_eq!(input.data_to, None);
    }
}
