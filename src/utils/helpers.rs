//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Short date used on cards, e.g. "Sat, Jul 15, 2023"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// Long date used as a screen header, e.g. "Saturday, July 15, 2023"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Numeric date used in list cards and share messages, e.g. "7/15/2023"
pub fn format_numeric_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Date range shown on trip cards
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_numeric_date(start), format_numeric_date(end))
}

/// Clock time shown on the day timeline, e.g. "1:30 PM"
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Country part of a destination written as "City, Country"
pub fn country_of(destination: &str) -> Option<String> {
    destination
        .rsplit(',')
        .next()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
}

/// Normalize an email for lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
