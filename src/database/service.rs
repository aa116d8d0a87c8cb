//! Database service layer
//!
//! Bundles the repositories behind their traits so services can share one handle.

use std::sync::Arc;

use crate::config::Settings;
use crate::database::repositories::{
    AuthRepository, InMemoryAuthRepository, InMemoryTripRepository, SimulatedLatency, TripRepository,
};

#[derive(Clone)]
pub struct DatabaseService {
    pub auth: Arc<dyn AuthRepository>,
    pub trips: Arc<dyn TripRepository>,
}

impl DatabaseService {
    pub fn new(auth: Arc<dyn AuthRepository>, trips: Arc<dyn TripRepository>) -> Self {
        Self { auth, trips }
    }

    /// Fresh in-memory repositories
    pub fn in_memory(latency: SimulatedLatency, hash_memory_kib: u32) -> Self {
        Self {
            auth: Arc::new(InMemoryAuthRepository::new(latency, hash_memory_kib)),
            trips: Arc::new(InMemoryTripRepository::new(latency)),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::in_memory(
            SimulatedLatency::from_millis(settings.network.simulated_latency_ms),
            settings.auth.password_hash_memory_kib,
        )
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService").finish_non_exhaustive()
    }
}
