//! Database module
//!
//! Normalized entity tables, repository traits with in-memory backends,
//! and the demo dataset.

pub mod repositories;
pub mod seed;
pub mod service;
pub mod tables;

// Re-export commonly used database components
pub use repositories::{
    AuthRepository, InMemoryAuthRepository, InMemoryTripRepository, ResetCode, SimulatedLatency,
    TripRepository,
};
pub use seed::{seed_demo_data, SeedSummary, DEMO_EMAIL, DEMO_PASSWORD};
pub use service::DatabaseService;
pub use tables::{TripChange, TripTables};
