//! State management module
//!
//! Session state, the shared trip store and the application context

pub mod context;
pub mod session;
pub mod store;

// Re-export commonly used state components
pub use context::AppContext;
pub use session::{Session, SessionPhase, SessionState};
pub use store::{StoreEvent, TripStore};
