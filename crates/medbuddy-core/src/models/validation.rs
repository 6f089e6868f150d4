//! Field validation shared by the form-backed models.

use thiserror::Error;
use validator::{validate_email, validate_length};

/// A field failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("{field} has an invalid format: {value}")]
    Format { field: &'static str, value: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reject empty or whitespace-only values.
pub fn require(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Check a value's character count against inclusive bounds.
pub fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    if !validate_length(value, Some(min as u64), Some(max as u64), None) {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

/// RFC 5322 address whose domain also carries a TLD (`local@domain.tld`).
pub fn check_email(value: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::Format {
        field: "email",
        value: value.to_string(),
    };

    if !validate_email(value) {
        return Err(invalid());
    }

    let domain = value.rsplit_once('@').map(|(_, d)| d).ok_or_else(invalid)?;
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
