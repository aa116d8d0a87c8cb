//! Form validation rules
//!
//! Field-level checks shared by the auth and trip screens. The `Display`
//! text of each [`ValidationError`] is the helper text shown under the form.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use thiserror::Error;

/// Minimum number of characters in a password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single failed form rule
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your name")]
    MissingName,

    #[error("Please enter your email")]
    MissingEmail,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Please enter a password")]
    MissingPassword,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter verification code")]
    MissingVerificationCode,

    #[error("Please enter a new password")]
    MissingNewPassword,

    #[error("Please enter a trip title")]
    MissingTitle,

    #[error("Please enter a destination")]
    MissingDestination,

    #[error("End date cannot be before start date")]
    EndBeforeStart,

    #[error("Please enter a valid budget")]
    InvalidBudget,

    #[error("Please enter a valid price")]
    InvalidPrice,

    #[error("Please enter a name")]
    MissingItemName,

    #[error("Please enter valid coordinates")]
    InvalidCoordinates,

    #[error("End time cannot be before start time")]
    EndTimeBeforeStartTime,

    #[error("Please enter a valid URL")]
    InvalidUrl,

    #[error("Please enter a transportation type")]
    MissingTransportationType,

    #[error("Please enter a comment")]
    EmptyComment,
}

type Validation<T = ()> = std::result::Result<T, ValidationError>;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Loose email shape check: something@something.something
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Validate a required email field
pub fn validate_email(email: &str) -> Validation {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate a password chosen by the user (register, reset)
pub fn validate_password(password: &str) -> Validation {
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Validate that the confirmation field repeats the password
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Validation {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate that a text field is not blank
pub fn validate_required(value: &str, error: ValidationError) -> Validation {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}

/// Validate a trip date range; a single-day trip has `start == end`
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Validation {
    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }
    Ok(())
}

/// Validate an optional start/end time pair
pub fn validate_time_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Validation {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::EndTimeBeforeStartTime);
        }
    }
    Ok(())
}

/// Parse an optional non-negative amount typed into a text field.
/// Blank input means "not set".
pub fn parse_optional_amount(text: &str, error: ValidationError) -> Validation<Option<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let amount: f64 = trimmed.parse().map_err(|_| error)?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(error);
    }
    Ok(Some(amount))
}

/// Validate an optional http(s) link. Blank input means "not set".
pub fn parse_optional_url(text: &str) -> Validation<Option<String>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl)?;
    match parsed.scheme() {
        "http" | "https" => Ok(Some(parsed.to_string())),
        _ => Err(ValidationError::InvalidUrl),
    }
}

/// Validate latitude/longitude bounds
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Validation {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
    if !(lat_ok && lon_ok) {
        return Err(ValidationError::InvalidCoordinates);
    }
    Ok(())
}
