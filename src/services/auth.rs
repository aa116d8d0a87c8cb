//! Authentication service implementation
//!
//! Sign-in, registration, password reset and session token persistence.
//! None of these touch session state; [`Session`](crate::state::Session) does.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use super::token::{SessionTokenStore, TokenService};
use crate::config::settings::Settings;
use crate::database::repositories::{AuthRepository, ResetCode};
use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::normalize_email;
use crate::utils::validation::{
    validate_email, validate_password, validate_password_confirmation, validate_required,
    ValidationError,
};

const RESET_CODE_DIGITS: u32 = 6;

/// Registration form contents
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Field checks in the order the form shows them
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_required(&self.name, ValidationError::MissingName)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_password_confirmation(&self.password, &self.confirm_password)?;
        Ok(())
    }
}

/// Password reset form contents
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_required(&self.code, ValidationError::MissingVerificationCode)?;
        validate_required(&self.new_password, ValidationError::MissingNewPassword)?;
        validate_password(&self.new_password)?;
        validate_password_confirmation(&self.new_password, &self.confirm_password)?;
        Ok(())
    }
}

/// Sign-in form checks
pub fn validate_login(email: &str, password: &str) -> std::result::Result<(), ValidationError> {
    validate_email(email)?;
    validate_required(password, ValidationError::MissingPassword)?;
    Ok(())
}

/// Authentication service for accounts and session tokens
#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn AuthRepository>,
    tokens: TokenService,
    token_store: Arc<dyn SessionTokenStore>,
    settings: Settings,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn AuthRepository>,
        token_store: Arc<dyn SessionTokenStore>,
        settings: Settings,
    ) -> Self {
        Self {
            repository,
            tokens: TokenService::new(&settings.auth),
            token_store,
            settings,
        }
    }

    /// Verify credentials and persist a fresh session token
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        validate_login(email, password)?;
        let email = normalize_email(email);
        debug!(email = %email, "Attempting login");

        let user = self
            .repository
            .verify_credentials(&email, password)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "Login rejected");
                TripPlannerError::Authentication("Invalid email or password".to_string())
            })?;

        let token = self.tokens.issue(&user)?;
        self.token_store.save(&token).await?;

        info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    /// Create an account. Does not sign the user in.
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        request.validate()?;
        debug!(email = %normalize_email(&request.email), "Registering account");

        let user = self
            .repository
            .create_user(
                CreateUserRequest {
                    email: request.email.clone(),
                    name: request.name.clone(),
                },
                &request.password,
            )
            .await?;

        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Issue a single-use verification code for the account
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        validate_email(email)?;
        let email = normalize_email(email);

        if self.repository.find_by_email(&email).await?.is_none() {
            warn!(email = %email, "Password reset requested for unknown account");
            return Err(TripPlannerError::Authentication(
                "No account found with this email".to_string(),
            ));
        }

        let ttl = Duration::minutes(self.settings.auth.reset_code_ttl_minutes.min(24 * 60) as i64);
        let code = ResetCode {
            code: generate_reset_code(),
            expires_at: Utc::now() + ttl,
        };
        self.repository.store_reset_code(&email, code).await?;

        info!(email = %email, "Password reset code issued");
        Ok(())
    }

    /// Consume the verification code and set a new password
    pub async fn reset_password(&self, code: &str, new_password: &str, email: &str) -> Result<()> {
        validate_email(email)?;
        validate_required(code, ValidationError::MissingVerificationCode)?;
        validate_required(new_password, ValidationError::MissingNewPassword)?;
        validate_password(new_password)?;
        let email = normalize_email(email);

        let invalid_code =
            || TripPlannerError::Authentication("Invalid or expired verification code".to_string());

        // Any attempt consumes the pending code
        let pending = self
            .repository
            .take_reset_code(&email)
            .await?
            .ok_or_else(invalid_code)?;
        if pending.is_expired(Utc::now()) || pending.code != code.trim() {
            warn!(email = %email, "Password reset code rejected");
            return Err(invalid_code());
        }

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_code)?;
        self.repository.set_password(&user.id, new_password).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// The user behind the persisted token, if it is still valid.
    /// Anything unusable is discarded and treated as signed out.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        let Some(token) = self.token_store.load().await? else {
            debug!("No persisted session token");
            return Ok(None);
        };

        let claims = match self.tokens.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Persisted session token rejected");
                self.token_store.clear().await?;
                return Ok(None);
            }
        };

        match self.repository.find_by_id(&claims.sub).await? {
            Some(user) => {
                info!(user_id = %user.id, "Session restored");
                Ok(Some(user))
            }
            None => {
                warn!(user_id = %claims.sub, "Session token refers to a missing account");
                self.token_store.clear().await?;
                Ok(None)
            }
        }
    }

    /// Forget the persisted session token
    pub async fn end_session(&self) -> Result<()> {
        self.token_store.clear().await?;
        debug!("Session token cleared");
        Ok(())
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

/// Zero-padded numeric code, e.g. "042917"
fn generate_reset_code() -> String {
    let upper = 10u32.pow(RESET_CODE_DIGITS);
    let value = rand::thread_rng().gen_range(0..upper);
    format!("{:0width$}", value, width = RESET_CODE_DIGITS as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation_order() {
        let mut request = RegisterRequest::default();
        assert_eq!(request.validate(), Err(ValidationError::MissingName));

        request.name = "Ada".to_string();
        assert_eq!(request.validate(), Err(ValidationError::MissingEmail));

        request.email = "ada@".to_string();
        assert_eq!(request.validate(), Err(ValidationError::InvalidEmail));

        request.email = "ada@example.com".to_string();
        assert_eq!(request.validate(), Err(ValidationError::MissingPassword));

        request.password = "short".to_string();
        assert_eq!(request.validate(), Err(ValidationError::PasswordTooShort));

        request.password = "longenough1".to_string();
        request.confirm_password = "longenough2".to_string();
        assert_eq!(request.validate(), Err(ValidationError::PasswordMismatch));

        request.confirm_password = "longenough1".to_string();
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn test_reset_validation_order() {
        let mut request = ResetPasswordRequest {
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(request.validate(), Err(ValidationError::MissingVerificationCode));
        request.code = "123456".to_string();
        assert_eq!(request.validate(), Err(ValidationError::MissingNewPassword));
        request.new_password = "short".to_string();
        assert_eq!(request.validate(), Err(ValidationError::PasswordTooShort));
        request.new_password = "longenough1".to_string();
        assert_eq!(request.validate(), Err(ValidationError::PasswordMismatch));
        request.confirm_password = "longenough1".to_string();
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn test_login_validation() {
        assert_eq!(validate_login("", "x"), Err(ValidationError::MissingEmail));
        assert_eq!(validate_login("dev@example.com", ""), Err(ValidationError::MissingPassword));
        assert_eq!(validate_login("dev@example.com", "x"), Ok(()));
    }

    #[test]
    fn test_reset_codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_reset_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
