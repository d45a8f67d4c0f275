//! Model selector validation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for model selectors
pub const MAX_SELECTOR_LENGTH: usize = 128;

/// Path separators are rejected so a selector can never address files
/// outside the model directory.
static SEPARATOR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\]").unwrap());

/// Selector validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Selector is empty
    Empty,
    /// Selector exceeds maximum length
    TooLong { length: usize, max: usize },
    /// Selector contains a path separator
    ContainsSeparator { name: String },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Model selector cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Model selector too long: {} characters (max {})", length, max)
            }
            Self::ContainsSeparator { name } => {
                write!(f, "Invalid model selector '{}': path separators are not allowed", name)
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// Validate a model selector taken from a request
pub fn validate_model_selector(name: &str) -> Result<(), SelectorError> {
    if name.is_empty() {
        return Err(SelectorError::Empty);
    }

    if name.len() > MAX_SELECTOR_LENGTH {
        return Err(SelectorError::TooLong {
            length: name.len(),
            max: MAX_SELECTOR_LENGTH,
        });
    }

    if SEPARATOR_PATTERN.is_match(name) {
        return Err(SelectorError::ContainsSeparator {
            name: name.to_string(),
        });
    }

    Ok(())
}
