//! TripPlanner client core
//!
//! Domain model, session handling, navigation and screen state controllers
//! for a collaborative trip planner. Trips are split into days holding
//! activities, accommodation options and transportation; members vote,
//! comment and pick accommodations together.

pub mod config;
pub mod database;
pub mod models;
pub mod navigation;
pub mod screens;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, TripPlannerError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use navigation::{RootRouter, RootState};
pub use services::ServiceFactory;
pub use state::{AppContext, Session, TripStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
