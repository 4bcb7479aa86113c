//! Validation of caller-supplied field names.
//!
//! Field names end up quoted inside SQL, so they are restricted to plain
//! identifiers.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),
}

/// Validate a searchable field name.
///
/// A field name must start with an ASCII letter or `_` and continue with ASCII
/// letters, digits or `_` (so `author__username` style lookups are accepted).
pub fn validate_field_name(field: &str) -> Result<(), ValidationError> {
    let mut chars = field.chars();

    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidFieldName(field.to_string()));
    }

    Ok(())
}
