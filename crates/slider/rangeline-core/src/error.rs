//! Error types for the slider core.

use serde::{Deserialize, Serialize};

/// Errors surfaced by configuration resolution, conversions and lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SliderError {
    /// Double-mode input value without a `from<sep>to` pair.
    #[error("input value {value:?} must contain two values separated by {separator:?}")]
    InputValueTokens { value: String, separator: String },

    /// `min == max`: there is no selectable range.
    #[error("zero-width domain: min and max are both {value}")]
    ZeroWidthDomain { value: f64 },

    /// A custom-value accessor was used without configured values.
    #[error("no custom values configured")]
    NoCustomValues,

    /// Negative index into the custom value list.
    #[error("custom value index {index} is negative")]
    NegativeIndex { index: f64 },

    /// Index past the end of the custom value list.
    #[error("custom value index {index} is out of range (len {len})")]
    IndexOutOfRange { index: f64, len: usize },

    /// The render collaborator does not provide an expected element or method.
    #[error("missing render target: {name}")]
    MissingRenderTarget { name: String },

    /// Configuration payload could not be decoded.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SliderError {
    /// Degenerate domains are handled by short-circuiting; everything else is a
    /// caller or collaborator bug.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ZeroWidthDomain { .. })
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InputValueTokens { .. } | Self::InvalidConfig { .. } => "config",
            Self::ZeroWidthDomain { .. } => "domain",
            Self::NoCustomValues | Self::NegativeIndex { .. } | Self::IndexOutOfRange { .. } => {
                "lookup"
            }
            Self::MissingRenderTarget { .. } => "render",
        }
    }
}

impl From<serde_json::Error> for SliderError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SliderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverability() {
        assert!(SliderError::ZeroWidthDomain { value: 5.0 }.is_recoverable());
        assert!(!SliderError::NoCustomValues.is_recoverable());
        assert!(!SliderError::InputValueTokens {
            value: "1".into(),
            separator: ";".into()
        }
        .is_recoverable());
    }

    #[test]
    fn categories() {
        assert_eq!(SliderError::NoCustomValues.category(), "lookup");
        assert_eq!(
            SliderError::IndexOutOfRange { index: 4.0, len: 3 }.category(),
            "lookup"
        );
        assert_eq!(
            SliderError::MissingRenderTarget {
                name: "trackWidth".into()
            }
            .category(),
            "render"
        );
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err = serde_json::from_str::<f64>("nope").unwrap_err();
        let e: SliderError = err.into();
        assert_eq!(e.category(), "config");
    }
}
