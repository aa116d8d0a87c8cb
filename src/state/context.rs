//! Application context
//!
//! The dependency-injection root: settings, repositories, services, the
//! shared trip store and the session, built once and handed to the router
//! and every screen.

use std::sync::Arc;

use tracing::info;

use super::session::Session;
use super::store::TripStore;
use crate::config::Settings;
use crate::database::{seed_demo_data, DatabaseService, SeedSummary};
use crate::services::{ServiceFactory, SessionTokenStore};
use crate::utils::errors::Result;

/// Application-wide context containing services and settings
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub database: DatabaseService,
    pub services: Arc<ServiceFactory>,
    pub store: TripStore,
    pub session: Arc<Session>,
}

impl AppContext {
    /// Wire the context around the given repositories and token store
    pub fn new(settings: Settings, database: DatabaseService, token_store: Arc<dyn SessionTokenStore>) -> Self {
        let store = TripStore::new();
        let services = Arc::new(ServiceFactory::new(
            settings.clone(),
            database.clone(),
            store.clone(),
            token_store,
        ));
        let session = Arc::new(Session::new(services.auth_service.clone(), store.clone()));

        Self {
            settings,
            database,
            services,
            store,
            session,
        }
    }

    /// In-memory repositories and the configured token store
    pub fn from_settings(settings: Settings) -> Self {
        let database = DatabaseService::from_settings(&settings);
        let token_store = ServiceFactory::token_store_for(&settings);
        Self::new(settings, database, token_store)
    }

    /// Build the context and seed demo data when the feature is enabled
    pub async fn build(settings: Settings) -> Result<(Self, Option<SeedSummary>)> {
        let context = Self::from_settings(settings);
        let seeded = if context.settings.features.seed_demo_data {
            Some(seed_demo_data(&context.database).await?)
        } else {
            None
        };

        info!(
            app = %context.settings.app.name,
            seeded = seeded.is_some(),
            latency_ms = context.settings.network.simulated_latency_ms,
            "Application context ready"
        );
        Ok((context, seeded))
    }
}
