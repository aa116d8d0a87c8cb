//! Session tokens
//!
//! Signed JWTs identify a signed-in user across launches. A
//! [`SessionTokenStore`] keeps the current token; the file-backed store
//! persists it as JSON between runs.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::models::User;
use crate::utils::errors::Result;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        // Capped at a century
        let ttl_hours = config.session_ttl_hours.min(24 * 365 * 100) as i64;
        Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        debug!(user_id = %user.id, "Session token issued");
        Ok(token)
    }

    /// Signature and expiry check
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Where the current session token lives between launches
#[async_trait]
pub trait SessionTokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>>;
    async fn save(&self, token: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Token kept for the lifetime of the process only
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionTokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.lock().await = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SessionTokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No persisted session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<PersistedSession>(&data) {
            Ok(session) => {
                debug!(path = %self.path.display(), saved_at = %session.saved_at, "Persisted session loaded");
                Ok(Some(session.token))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let session = PersistedSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        tokio::fs::write(&self.path, serde_json::to_vec(&session)?).await?;
        debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::utils::errors::TripPlannerError;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: "user-1".to_string(),
            email: "dev@example.com".to_string(),
            name: "Development User".to_string(),
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(&Settings::for_tests().auth);
        let token = service.issue(&user()).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "dev@example.com");
    }

    #[test]
    fn test_rejects_foreign_and_expired_tokens() {
        let config = Settings::for_tests().auth;
        let service = TokenService::new(&config);

        let mut other_config = config.clone();
        other_config.token_secret = "another-secret".to_string();
        let foreign = TokenService::new(&other_config).issue(&user()).unwrap();
        assert!(matches!(service.verify(&foreign), Err(TripPlannerError::Token(_))));

        let long_ago = Utc::now() - Duration::days(365);
        let expired = service.issue_at(&user(), long_ago).unwrap();
        assert!(service.verify(&expired).is_err());
        assert!(service.verify("not-a-token").is_err());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().await.unwrap(), None);
        store.save("abc").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("abc".to_string()));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_discards_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!path.exists());
    }
}
