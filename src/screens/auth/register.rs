//! Account registration screen

use std::sync::Arc;

use crate::navigation::{AuthRoute, NavAction};
use crate::screens::{ScreenLifetime, SubmitState};
use crate::services::auth::RegisterRequest;
use crate::state::Session;
use crate::utils::errors::Result;

#[derive(Debug)]
pub struct RegisterScreen {
    session: Arc<Session>,
    lifetime: ScreenLifetime,
    pub form: RegisterRequest,
    pub password_visible: bool,
    pub confirm_password_visible: bool,
    pub submit: SubmitState,
}

impl RegisterScreen {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            lifetime: ScreenLifetime::new(),
            form: RegisterRequest::default(),
            password_visible: false,
            confirm_password_visible: false,
            submit: SubmitState::default(),
        }
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub fn can_submit(&self) -> bool {
        !self.submit.submitting
    }

    /// Create the account and continue to sign-in
    pub async fn submit(&mut self) -> Result<NavAction<AuthRoute>> {
        self.submit.begin()?;
        if let Err(e) = self.form.validate() {
            return Err(self.submit.reject(e));
        }

        let result = self
            .lifetime
            .guard(self.session.register(self.form.clone()))
            .await;
        self.submit.record("register", &result);
        let user = result?;

        self.submit.succeed(None);
        self.form = RegisterRequest {
            email: user.email,
            ..RegisterRequest::default()
        };
        Ok(NavAction::Navigate(AuthRoute::Login))
    }

    pub fn sign_in_instead(&self) -> NavAction<AuthRoute> {
        NavAction::Navigate(AuthRoute::Login)
    }

    pub fn back(&self) -> NavAction<AuthRoute> {
        NavAction::GoBack
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
