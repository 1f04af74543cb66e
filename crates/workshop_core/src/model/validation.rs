//! Input validation shared by user, workshop and registration use-cases.
//!
//! Checks are limited to presence and email shape; anything richer belongs
//! to the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Rejected input, reported back to API callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    MissingField(&'static str),
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Capacity must be a non-negative integer.
    InvalidCapacity(i64),
    /// Schedule is not an ISO-8601 date-time.
    InvalidDateTime(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidEmail(_) => write!(f, "Invalid email format"),
            Self::InvalidCapacity(value) => {
                write!(f, "capacity must be a non-negative integer, got {value}")
            }
            Self::InvalidDateTime(value) => write!(f, "invalid dateTime `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when empty.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims `value` and checks it against the accepted email shape.
pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let trimmed = require_text("email", value)?;
    if !EMAIL_RE.is_match(&trimmed) {
        return Err(ValidationError::InvalidEmail(trimmed));
    }
    Ok(trimmed)
}

/// Converts a wire capacity into the stored unsigned form.
pub fn validate_capacity(value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::InvalidCapacity(value))
}

/// Accepts RFC 3339 (`2025-12-15T14:00:00Z`) or naive local
/// (`2025-12-15T14:00[:00]`) date-times and returns the trimmed input.
pub fn validate_date_time(value: &str) -> Result<String, ValidationError> {
    let trimmed = require_text("dateTime", value)?;
    let parses = chrono::DateTime::parse_from_rfc3339(&trimmed).is_ok()
        || chrono::NaiveDateTime::parse_from_str(&trimmed, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || chrono::NaiveDateTime::parse_from_str(&trimmed, "%Y-%m-%dT%H:%M").is_ok();
    if !parses {
        return Err(ValidationError::InvalidDateTime(trimmed));
    }
    Ok(trimmed)
}
