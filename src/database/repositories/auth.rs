//! Auth repository: accounts, credentials and password reset codes

use std::collections::HashMap;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use tokio::sync::RwLock;
use tracing::debug;

use super::SimulatedLatency;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, User};
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::{generate_uuid, normalize_email};

/// A pending password reset code
#[derive(Debug, Clone, PartialEq)]
pub struct ResetCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Create an account; fails with `Duplicate` when the email is taken
    async fn create_user(&self, request: CreateUserRequest, password: &str) -> Result<User>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// The account matching the credentials, `None` on any mismatch
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>>;

    async fn update_user(&self, user_id: &str, request: UpdateUserRequest) -> Result<User>;

    async fn set_password(&self, user_id: &str, password: &str) -> Result<()>;

    /// Replace any pending code for the email
    async fn store_reset_code(&self, email: &str, code: ResetCode) -> Result<()>;

    /// Remove and return the pending code for the email
    async fn take_reset_code(&self, email: &str) -> Result<Option<ResetCode>>;
}

struct Account {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct AuthTables {
    accounts: HashMap<String, Account>,
    /// normalized email -> user id
    emails: HashMap<String, String>,
    reset_codes: HashMap<String, ResetCode>,
}

/// In-memory account store with Argon2-hashed passwords
pub struct InMemoryAuthRepository {
    tables: RwLock<AuthTables>,
    latency: SimulatedLatency,
    hash_memory_kib: u32,
}

impl InMemoryAuthRepository {
    pub fn new(latency: SimulatedLatency, hash_memory_kib: u32) -> Self {
        Self {
            tables: RwLock::new(AuthTables::default()),
            latency,
            hash_memory_kib,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.hash_memory_kib, Params::DEFAULT_T_COST, 1, None)
            .map_err(|e| TripPlannerError::Config(format!("Invalid password hash parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| TripPlannerError::InvalidInput(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| TripPlannerError::InvalidInput(format!("Stored password hash is invalid: {}", e)))?;
        Ok(self
            .hasher()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// The code currently pending for an email, without consuming it.
    /// Stands in for reading the verification email.
    pub async fn pending_reset_code(&self, email: &str) -> Option<String> {
        let tables = self.tables.read().await;
        tables
            .reset_codes
            .get(&normalize_email(email))
            .map(|c| c.code.clone())
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn create_user(&self, request: CreateUserRequest, password: &str) -> Result<User> {
        self.latency.wait().await;
        let email = normalize_email(&request.email);
        let password_hash = self.hash_password(password)?;

        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(&email) {
            return Err(TripPlannerError::Duplicate(
                "An account with this email".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: generate_uuid(),
            email: email.clone(),
            name: request.name.trim().to_string(),
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        tables.emails.insert(email, user.id.clone());
        tables.accounts.insert(
            user.id.clone(),
            Account {
                user: user.clone(),
                password_hash,
            },
        );

        debug!(user_id = %user.id, "Account created");
        Ok(user)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(user_id).map(|a| a.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(&normalize_email(email))
            .and_then(|id| tables.accounts.get(id))
            .map(|a| a.user.clone()))
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        let Some(account) = tables
            .emails
            .get(&normalize_email(email))
            .and_then(|id| tables.accounts.get(id))
        else {
            return Ok(None);
        };

        if self.verify_password(password, &account.password_hash)? {
            Ok(Some(account.user.clone()))
        } else {
            Ok(None)
        }
    }

    async fn update_user(&self, user_id: &str, request: UpdateUserRequest) -> Result<User> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        let account = tables
            .accounts
            .get_mut(user_id)
            .ok_or_else(|| TripPlannerError::UserNotFound {
                user_id: user_id.to_string(),
            })?;

        if let Some(name) = request.name {
            account.user.name = name;
        }
        if let Some(picture) = request.profile_picture {
            account.user.profile_picture = Some(picture);
        }
        account.user.updated_at = Utc::now();
        Ok(account.user.clone())
    }

    async fn set_password(&self, user_id: &str, password: &str) -> Result<()> {
        self.latency.wait().await;
        let password_hash = self.hash_password(password)?;
        let mut tables = self.tables.write().await;
        let account = tables
            .accounts
            .get_mut(user_id)
            .ok_or_else(|| TripPlannerError::UserNotFound {
                user_id: user_id.to_string(),
            })?;
        account.password_hash = password_hash;
        account.user.updated_at = Utc::now();
        Ok(())
    }

    async fn store_reset_code(&self, email: &str, code: ResetCode) -> Result<()> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.reset_codes.insert(normalize_email(email), code);
        Ok(())
    }

    async fn take_reset_code(&self, email: &str) -> Result<Option<ResetCode>> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        Ok(tables.reset_codes.remove(&normalize_email(email)))
    }
}
