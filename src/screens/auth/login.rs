//! Sign-in screen

use std::sync::Arc;

use crate::models::User;
use crate::navigation::{AuthRoute, NavAction};
use crate::screens::{ScreenLifetime, SubmitState};
use crate::services::auth::validate_login;
use crate::state::Session;
use crate::utils::errors::Result;

#[derive(Debug)]
pub struct LoginScreen {
    session: Arc<Session>,
    lifetime: ScreenLifetime,
    pub email: String,
    pub password: String,
    pub password_visible: bool,
    pub submit: SubmitState,
}

impl LoginScreen {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            lifetime: ScreenLifetime::new(),
            email: String::new(),
            password: String::new(),
            password_visible: false,
            submit: SubmitState::default(),
        }
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
    }

    /// Submit control enabled
    pub fn can_submit(&self) -> bool {
        !self.submit.submitting && !self.email.trim().is_empty() && !self.password.is_empty()
    }

    /// Sign in. On success the root router swaps to the Main tree by itself.
    pub async fn submit(&mut self) -> Result<User> {
        self.submit.begin()?;
        if let Err(e) = validate_login(&self.email, &self.password) {
            return Err(self.submit.reject(e));
        }

        let result = self
            .lifetime
            .guard(self.session.login(&self.email, &self.password))
            .await;
        self.submit.record("login", &result);
        if result.is_ok() {
            self.submit.succeed(None);
            self.password.clear();
        }
        result
    }

    pub fn forgot_password(&self) -> NavAction<AuthRoute> {
        NavAction::Navigate(AuthRoute::ForgotPassword)
    }

    pub fn create_account(&self) -> NavAction<AuthRoute> {
        NavAction::Navigate(AuthRoute::Register)
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
