//! Test context for unified test setup
//!
//! Wires an [`AppContext`] around in-memory repositories that the tests keep
//! concrete handles to, so they can read pending reset codes and counts.

use std::sync::Arc;

use trip_planner::config::Settings;
use trip_planner::database::{DatabaseService, InMemoryAuthRepository, InMemoryTripRepository, SimulatedLatency};
use trip_planner::models::{CreateTripRequest, Trip, User};
use trip_planner::services::{MemoryTokenStore, RegisterRequest};
use trip_planner::state::AppContext;

use super::test_data::{date, TEST_PASSWORD};

pub struct TestContext {
    pub app: AppContext,
    pub auth_repo: Arc<InMemoryAuthRepository>,
    pub trip_repo: Arc<InMemoryTripRepository>,
    pub token_store: Arc<MemoryTokenStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(Settings::for_tests())
    }

    /// Every repository call waits `millis` before answering
    pub fn with_latency(millis: u64) -> Self {
        let mut settings = Settings::for_tests();
        settings.network.simulated_latency_ms = millis;
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: Settings) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let latency = SimulatedLatency::from_millis(settings.network.simulated_latency_ms);
        let auth_repo = Arc::new(InMemoryAuthRepository::new(
            latency,
            settings.auth.password_hash_memory_kib,
        ));
        let trip_repo = Arc::new(InMemoryTripRepository::new(latency));
        let token_store = Arc::new(MemoryTokenStore::new());
        let database = DatabaseService::new(auth_repo.clone(), trip_repo.clone());
        let app = AppContext::new(settings, database, token_store.clone());

        Self {
            app,
            auth_repo,
            trip_repo,
            token_store,
        }
    }

    /// A second app sharing this one's repositories and token store,
    /// like the same account on another device
    pub fn second_device(&self) -> AppContext {
        let database = DatabaseService::new(self.auth_repo.clone(), self.trip_repo.clone());
        AppContext::new(self.app.settings.clone(), database, Arc::new(MemoryTokenStore::new()))
    }

    pub async fn register(&self, name: &str, email: &str) -> User {
        self.app
            .services
            .auth_service
            .register(RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                confirm_password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("Failed to register test account")
    }

    pub async fn sign_in(&self, email: &str) -> User {
        self.app
            .session
            .login(email, TEST_PASSWORD)
            .await
            .expect("Failed to sign in")
    }

    /// Register an account and sign in with it
    pub async fn signed_in(&self, name: &str, email: &str) -> User {
        self.register(name, email).await;
        self.sign_in(email).await
    }

    /// A three-day trip starting on 2023-07-15
    pub async fn create_trip(&self, owner: &User, title: &str, destination: &str) -> Trip {
        self.app
            .services
            .trip_service
            .create_trip(
                &owner.id,
                CreateTripRequest::new(title, destination, date(2023, 7, 15), date(2023, 7, 17)),
            )
            .await
            .expect("Failed to create trip")
    }
}
