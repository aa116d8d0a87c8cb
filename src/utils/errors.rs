//! Error handling for TripPlanner
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

pub use super::validation::ValidationError;

/// Main error type for TripPlanner
#[derive(Error, Debug)]
pub enum TripPlannerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Trip not found: {trip_id}")]
    TripNotFound { trip_id: String },

    #[error("Activity not found: {activity_id}")]
    ActivityNotFound { activity_id: String },

    #[error("Accommodation not found: {accommodation_id}")]
    AccommodationNotFound { accommodation_id: String },

    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: String },

    #[error("Day {day_index} is outside the date range of trip {trip_id}")]
    DayOutOfRange { trip_id: String, day_index: u32 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("More than one accommodation selected on day {day_index}")]
    SelectionConflict { day_index: u32 },

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Another operation is already in progress")]
    Busy,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for TripPlanner operations
pub type Result<T> = std::result::Result<T, TripPlannerError>;

impl TripPlannerError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TripPlannerError::Validation(_) => true,
            TripPlannerError::Authentication(_) => true,
            TripPlannerError::NotAuthenticated => false,
            TripPlannerError::PermissionDenied(_) => false,
            TripPlannerError::UserNotFound { .. } => false,
            TripPlannerError::TripNotFound { .. } => false,
            TripPlannerError::ActivityNotFound { .. } => false,
            TripPlannerError::AccommodationNotFound { .. } => false,
            TripPlannerError::CommentNotFound { .. } => false,
            TripPlannerError::DayOutOfRange { .. } => false,
            TripPlannerError::InvalidStateTransition { .. } => false,
            TripPlannerError::SelectionConflict { .. } => true,
            TripPlannerError::Duplicate(_) => true,
            TripPlannerError::Busy => true,
            TripPlannerError::Cancelled => true,
            TripPlannerError::Token(_) => false,
            TripPlannerError::Config(_) => false,
            TripPlannerError::Serialization(_) => false,
            TripPlannerError::Io(_) => true,
            TripPlannerError::UrlParse(_) => true,
            TripPlannerError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TripPlannerError::Config(_) => ErrorSeverity::Critical,
            TripPlannerError::Serialization(_) => ErrorSeverity::Critical,
            TripPlannerError::PermissionDenied(_) => ErrorSeverity::Warning,
            TripPlannerError::Authentication(_) => ErrorSeverity::Warning,
            TripPlannerError::NotAuthenticated => ErrorSeverity::Warning,
            TripPlannerError::Token(_) => ErrorSeverity::Warning,
            TripPlannerError::Validation(_) => ErrorSeverity::Info,
            TripPlannerError::InvalidInput(_) => ErrorSeverity::Info,
            TripPlannerError::Busy => ErrorSeverity::Info,
            TripPlannerError::Cancelled => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message shown inline next to the form or list that triggered the error
    pub fn user_message(&self) -> String {
        match self {
            TripPlannerError::Validation(e) => e.to_string(),
            TripPlannerError::Authentication(msg) => msg.clone(),
            TripPlannerError::NotAuthenticated => "Please sign in to continue".to_string(),
            TripPlannerError::PermissionDenied(_) => {
                "You don't have permission to do that".to_string()
            }
            TripPlannerError::TripNotFound { .. } => "This trip no longer exists".to_string(),
            TripPlannerError::ActivityNotFound { .. } => "This activity no longer exists".to_string(),
            TripPlannerError::AccommodationNotFound { .. } => {
                "This accommodation no longer exists".to_string()
            }
            TripPlannerError::DayOutOfRange { .. } => {
                "This day is outside the trip dates".to_string()
            }
            TripPlannerError::SelectionConflict { day_index } => format!(
                "Day {} has more than one selected accommodation",
                day_index + 1
            ),
            TripPlannerError::Duplicate(what) => format!("{} already exists", what),
            TripPlannerError::Busy => "Please wait for the current request to finish".to_string(),
            TripPlannerError::InvalidInput(msg) => msg.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = TripPlannerError::from(ValidationError::PasswordTooShort);
        assert_eq!(err.user_message(), "Password must be at least 8 characters");
        assert_eq!(err.severity(), ErrorSeverity::Info);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_selection_conflict_message_uses_one_based_day() {
        let err = TripPlannerError::SelectionConflict { day_index: 2 };
        assert_eq!(err.user_message(), "Day 3 has more than one selected accommodation");
    }

    #[test]
    fn test_internal_errors_get_generic_message() {
        let err = TripPlannerError::Config("missing secret".to_string());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
    }
}
