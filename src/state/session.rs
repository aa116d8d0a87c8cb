//! Session state
//!
//! The signed-in user and the lifecycle around it: `initialize` restores a
//! persisted session (failing closed), `login` authenticates, `logout` clears.
//! Observers hold a `watch` receiver. Account operations are single-flight:
//! a second one while another is pending fails with `Busy`.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::store::TripStore;
use crate::models::User;
use crate::services::auth::{AuthService, RegisterRequest};
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::logging::{log_operation_failure, log_user_action};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Persisted session not checked yet
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Snapshot published to observers
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    /// An account operation is pending
    pub is_loading: bool,
    /// Message of the last failed operation
    pub error: Option<String>,
}

impl SessionState {
    fn initializing() -> Self {
        Self {
            phase: SessionPhase::Initializing,
            user: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated && self.user.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    fn sign_in(&mut self, user: &User) {
        self.phase = SessionPhase::Authenticated;
        self.user = Some(user.clone());
    }

    fn sign_out(&mut self) {
        self.phase = SessionPhase::Unauthenticated;
        self.user = None;
    }
}

pub struct Session {
    auth: AuthService,
    store: TripStore,
    state: watch::Sender<SessionState>,
    in_flight: Mutex<()>,
    /// Bumped on logout so late results of pending operations are dropped
    generation: AtomicU64,
}

impl Session {
    pub fn new(auth: AuthService, store: TripStore) -> Self {
        let (state, _) = watch::channel(SessionState::initializing());
        Self {
            auth,
            store,
            state,
            in_flight: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// The signed-in user or `NotAuthenticated`
    pub fn require_user(&self) -> Result<User> {
        self.current_user().ok_or(TripPlannerError::NotAuthenticated)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run one account operation with the loading flag raised. `apply`
    /// updates the state on success unless a logout happened meanwhile.
    async fn exclusive<T, F, A>(&self, operation: &'static str, work: F, apply: A) -> Result<T>
    where
        F: Future<Output = Result<T>>,
        A: FnOnce(&mut SessionState, &T),
    {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            debug!(operation = operation, "Rejected while another operation is pending");
            TripPlannerError::Busy
        })?;

        let generation = self.generation.load(Ordering::SeqCst);
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = work.await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(operation = operation, "Result dropped after sign out");
            return Err(TripPlannerError::Cancelled);
        }

        match &result {
            Ok(value) => self.state.send_modify(|s| {
                s.is_loading = false;
                apply(s, value);
            }),
            Err(e) => {
                log_operation_failure(operation, e);
                let message = e.user_message();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
            }
        }
        result
    }

    /// Restore a persisted session. Anything other than a valid token for
    /// an existing account leaves the session signed out.
    pub async fn initialize(&self) -> Result<()> {
        let result = self
            .exclusive("initialize", self.auth.restore_session(), |s, user| match user {
                Some(user) => s.sign_in(user),
                None => s.sign_out(),
            })
            .await;

        if let Err(e) = &result {
            if !matches!(e, TripPlannerError::Busy | TripPlannerError::Cancelled) {
                warn!(error = %e, "Session restore failed, continuing signed out");
                self.state.send_modify(|s| s.sign_out());
            }
        }
        result.map(|_| ())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let result = self
            .exclusive("login", self.auth.login(email, password), |s, user| s.sign_in(user))
            .await;

        if matches!(result, Err(TripPlannerError::Cancelled)) {
            // Signed out while the login was pending; drop the fresh token too
            self.auth.end_session().await?;
        }
        if let Ok(user) = &result {
            log_user_action(&user.id, "login", None);
        }
        result
    }

    /// Creates the account; the caller navigates to Login afterwards
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        self.exclusive("register", self.auth.register(request), |_, _| {})
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.exclusive("forgot_password", self.auth.forgot_password(email), |_, _| {})
            .await
    }

    pub async fn reset_password(&self, code: &str, new_password: &str, email: &str) -> Result<()> {
        self.exclusive(
            "reset_password",
            self.auth.reset_password(code, new_password, email),
            |_, _| {},
        )
        .await
    }

    /// Always leaves the session signed out, even when repeated or while
    /// another operation is pending
    pub async fn logout(&self) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let user_id = self.state.borrow().user.as_ref().map(|u| u.id.clone());

        self.state.send_modify(|s| {
            s.sign_out();
            s.is_loading = false;
            s.error = None;
        });
        self.store.clear().await;
        self.auth.end_session().await?;

        match user_id {
            Some(user_id) => {
                log_user_action(&user_id, "logout", None);
                info!(user_id = %user_id, "Signed out");
            }
            None => debug!("Sign out with no active session"),
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
