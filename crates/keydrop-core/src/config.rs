#![forbid(unsafe_code)]

//! Configuration diagnostics shared by sensor configs.

use std::fmt;

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    #[must_use]
    pub fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Parse a positive, finite float.
#[must_use]
pub fn parse_positive_f64(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field_value_and_message() {
        let err = ConfigError::new("step", "-1", "must be > 0");
        assert_eq!(err.to_string(), "step=-1 (must be > 0)");
    }

    #[test]
    fn parse_positive_f64_rejects_bad_values() {
        assert_eq!(parse_positive_f64(" 25 "), Some(25.0));
        assert_eq!(parse_positive_f64("0"), None);
        assert_eq!(parse_positive_f64("-3"), None);
        assert_eq!(parse_positive_f64("inf"), None);
        assert_eq!(parse_positive_f64("abc"), None);
    }
}
