//! Error types for parsing generation options.

use thiserror::Error;

/// Errors raised when a textual option value is not recognized.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionError {
    /// The value is not one of the accepted variants.
    #[error("Invalid value '{value}' for {option} (expected one of: {expected})")]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl OptionError {
    /// Create a new invalid value error.
    pub fn invalid(option: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            option,
            value: value.into(),
            expected,
        }
    }
}

/// Result type for option parsing.
pub type OptionResult<T> = Result<T, OptionError>;
