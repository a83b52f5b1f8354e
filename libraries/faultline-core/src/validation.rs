//! Pure field validators.
//!
//! The create and update paths apply exactly the same rules, so the rules
//! live here once and both handlers call into them. Each validator returns a
//! typed [`FieldError`] naming the offending field.

use thiserror::Error;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 255;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 5000;
pub const PASSWORD_MIN: usize = 6;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check that an email has the `local@domain.tld` shape: a non-empty local
/// part, a single `@`, and a domain with at least one dot and a non-empty
/// label on each side of it. No whitespace anywhere.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let invalid = || FieldError::new("email", "must be a valid email address");

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(FieldError::new(
            "password",
            format!("must be at least {PASSWORD_MIN} characters"),
        ));
    }
    Ok(())
}

/// Trim and length-check an issue title, returning the trimmed value.
pub fn validate_title(title: &str) -> Result<String, FieldError> {
    let trimmed = title.trim();
    let len = trimmed.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(FieldError::new(
            "title",
            format!("must be between {TITLE_MIN} and {TITLE_MAX} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim and length-check an issue description, returning the trimmed value.
pub fn validate_description(description: &str) -> Result<String, FieldError> {
    let trimmed = description.trim();
    let len = trimmed.chars().count();
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
        return Err(FieldError::new(
            "description",
            format!("must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"),
        ));
    }
    Ok(trimmed.to_string())
}
