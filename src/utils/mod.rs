//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, form validation, logging setup, and helper functions.

pub mod errors;
pub mod helpers;
pub mod logging;
pub mod validation;

pub use errors::{Result, TripPlannerError};
pub use validation::ValidationError;
