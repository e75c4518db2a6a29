//! Field-level validation shared by every entity DTO.

use crate::error::CoreError;

/// Maximum length (in characters) of names, titles, emails and descriptions.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Validate a required text field: non-blank and at most `max` characters.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    validate_length(field, value, max)
}

/// Validate an optional text field: when present, at most `max` characters.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_length(field, v, max),
        None => Ok(()),
    }
}

/// Minimal structural email check (`local@domain` with a dot in the domain).
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    validate_required_text("email", email, MAX_TEXT_LENGTH)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(CoreError::Validation(format!(
            "email '{email}' is not a valid address"
        )));
    }
    Ok(())
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}
