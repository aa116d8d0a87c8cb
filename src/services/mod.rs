//! Services module
//!
//! This module contains business logic services

pub mod access;
pub mod auth;
pub mod itinerary;
pub mod token;
pub mod trip;

// Re-export commonly used services
pub use access::{TripAccess, TripPermission, TripRole};
pub use auth::{AuthService, RegisterRequest, ResetPasswordRequest};
pub use itinerary::ItineraryService;
pub use token::{FileTokenStore, MemoryTokenStore, SessionClaims, SessionTokenStore, TokenService};
pub use trip::{ProfileStats, SharePayload, TripMember, TripService};

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::state::store::TripStore;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub trip_service: TripService,
    pub itinerary_service: ItineraryService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: Settings,
        database: DatabaseService,
        store: TripStore,
        token_store: Arc<dyn SessionTokenStore>,
    ) -> Self {
        let auth_service = AuthService::new(database.auth.clone(), token_store, settings.clone());
        let trip_service = TripService::new(database.clone(), store.clone(), settings);
        let itinerary_service = ItineraryService::new(database, store);

        Self {
            auth_service,
            trip_service,
            itinerary_service,
        }
    }

    /// Token store chosen by configuration: a file when one is configured
    pub fn token_store_for(settings: &Settings) -> Arc<dyn SessionTokenStore> {
        match &settings.auth.session_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }
}
