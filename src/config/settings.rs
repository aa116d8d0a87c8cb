//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// General application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    /// URL scheme used for shared trip links, e.g. `tripplanner://trips/42`
    pub deep_link_scheme: String,
}

/// Session and credential configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens
    pub token_secret: String,
    pub session_ttl_hours: u64,
    /// Where the session token is persisted between launches; memory only when unset
    pub session_file: Option<String>,
    pub reset_code_ttl_minutes: u64,
    /// Argon2 memory cost for stored passwords
    pub password_hash_memory_kib: u32,
}

/// Simulated backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Fixed delay applied to every in-memory repository call
    pub simulated_latency_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily rolling log files; stdout only when unset
    pub directory: Option<String>,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub seed_demo_data: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("TRIPPLANNER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TripPlannerError> {
        super::validation::validate_settings(self)
    }

    /// Settings for tests and embedded use: no latency, no persistence, no seed data
    pub fn for_tests() -> Self {
        let mut settings = Self::default();
        settings.network.simulated_latency_ms = 0;
        settings.auth.session_file = None;
        settings.auth.password_hash_memory_kib = 256;
        settings.features.seed_demo_data = false;
        settings
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppConfig {
                name: "TripPlanner".to_string(),
                deep_link_scheme: "tripplanner".to_string(),
            },
            auth: AuthConfig {
                token_secret: "change-me-in-production".to_string(),
                session_ttl_hours: 24 * 30,
                session_file: None,
                reset_code_ttl_minutes: 15,
                password_hash_memory_kib: 19 * 1024,
            },
            network: NetworkConfig {
                simulated_latency_ms: 500,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
            features: FeaturesConfig {
                seed_demo_data: true,
            },
        }
    }
}
