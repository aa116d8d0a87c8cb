//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, TripPlannerError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_app_config(&settings.app)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

/// Validate general application configuration
fn validate_app_config(config: &super::AppConfig) -> Result<()> {
    if config.name.trim().is_empty() {
        return Err(TripPlannerError::Config("App name is required".to_string()));
    }

    let sample_link = format!("{}://trips", config.deep_link_scheme);
    match url::Url::parse(&sample_link) {
        Ok(url) if url.scheme() == config.deep_link_scheme => Ok(()),
        _ => Err(TripPlannerError::Config(format!(
            "Invalid deep link scheme: {}",
            config.deep_link_scheme
        ))),
    }
}

/// Validate session configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.token_secret.is_empty() {
        return Err(TripPlannerError::Config(
            "Session token secret is required".to_string(),
        ));
    }

    if config.session_ttl_hours == 0 {
        return Err(TripPlannerError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    if config.reset_code_ttl_minutes == 0 {
        return Err(TripPlannerError::Config(
            "Reset code TTL must be greater than 0".to_string(),
        ));
    }

    if config.password_hash_memory_kib < 8 {
        return Err(TripPlannerError::Config(
            "Password hash memory must be at least 8 KiB".to_string(),
        ));
    }

    if let Some(path) = &config.session_file {
        if path.trim().is_empty() {
            return Err(TripPlannerError::Config(
                "Session file path cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TripPlannerError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TripPlannerError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
        assert!(validate_settings(&Settings::for_tests()).is_ok());
    }

    #[test]
    fn test_rejects_empty_secret() {
        let mut settings = Settings::default();
        settings.auth.token_secret.clear();
        assert!(matches!(
            validate_settings(&settings),
            Err(TripPlannerError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let mut settings = Settings::default();
        settings.app.deep_link_scheme = "trip planner".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let mut settings = Settings::default();
        settings.auth.session_ttl_hours = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
