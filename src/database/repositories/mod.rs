//! Repository interfaces and their in-memory implementations
//!
//! Services depend on the [`AuthRepository`] and [`TripRepository`] traits only.
//! The in-memory implementations stand in for a remote backend and apply a
//! fixed simulated latency to every call.

pub mod auth;
pub mod trip;

use std::time::Duration;

pub use auth::{AuthRepository, InMemoryAuthRepository, ResetCode};
pub use trip::{InMemoryTripRepository, TripRepository};

/// Fixed delay standing in for a network round trip
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedLatency(Duration);

impl SimulatedLatency {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn none() -> Self {
        Self(Duration::ZERO)
    }

    pub async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}
