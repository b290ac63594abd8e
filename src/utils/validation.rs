//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings
//! - Validating identifier-like names used for renaming

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Characters that make up an identifier for whole-word matching.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Validate an identifier-like name (`Acme`, `Myrtus.Clarity`).
///
/// The name must be non-empty, start and end with an identifier character and
/// contain no whitespace, path separators or control characters. Dots are
/// allowed in the middle.
pub fn require_identifier<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let name = require_non_empty(value, field, &format!("{} cannot be empty", field))?;

    if name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '/' || c == '\\')
    {
        return Err(Error::validation_invalid_argument(
            field,
            format!("{} must not contain whitespace or path separators", field),
            Some(name.to_string()),
            None,
        ));
    }

    let first_ok = name.chars().next().is_some_and(is_identifier_char);
    let last_ok = name.chars().next_back().is_some_and(is_identifier_char);
    if !first_ok || !last_ok {
        return Err(Error::validation_invalid_argument(
            field,
            format!("{} must start and end with a letter, digit or underscore", field),
            Some(name.to_string()),
            None,
        ));
    }

    Ok(name)
}
