//! Password reset screen
//!
//! Two steps on one screen: request a verification code for an email, then
//! enter the code with a new password.

use std::sync::Arc;

use crate::navigation::{AuthRoute, NavAction};
use crate::screens::{ScreenLifetime, SubmitState};
use crate::services::auth::ResetPasswordRequest;
use crate::state::Session;
use crate::utils::errors::Result;
use crate::utils::validation::validate_email;

pub const CODE_SENT_MESSAGE: &str = "Verification code sent to your email";
pub const RESET_DONE_MESSAGE: &str = "Password reset successful";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    RequestCode,
    EnterCode,
}

#[derive(Debug)]
pub struct ForgotPasswordScreen {
    session: Arc<Session>,
    lifetime: ScreenLifetime,
    step: ResetStep,
    pub form: ResetPasswordRequest,
    pub submit: SubmitState,
}

impl ForgotPasswordScreen {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            lifetime: ScreenLifetime::new(),
            step: ResetStep::RequestCode,
            form: ResetPasswordRequest::default(),
            submit: SubmitState::default(),
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub async fn send_code(&mut self) -> Result<()> {
        self.submit.begin()?;
        if let Err(e) = validate_email(&self.form.email) {
            return Err(self.submit.reject(e));
        }

        let result = self
            .lifetime
            .guard(self.session.forgot_password(&self.form.email))
            .await;
        self.submit.record("forgot_password", &result);
        result?;

        self.submit.succeed(Some(CODE_SENT_MESSAGE));
        self.step = ResetStep::EnterCode;
        Ok(())
    }

    /// Set the new password, then continue to sign-in
    pub async fn reset_password(&mut self) -> Result<NavAction<AuthRoute>> {
        self.submit.begin()?;
        if let Err(e) = self.form.validate() {
            return Err(self.submit.reject(e));
        }

        let result = self
            .lifetime
            .guard(self.session.reset_password(
                &self.form.code,
                &self.form.new_password,
                &self.form.email,
            ))
            .await;
        self.submit.record("reset_password", &result);
        result?;

        self.submit.succeed(Some(RESET_DONE_MESSAGE));
        self.form.code.clear();
        self.form.new_password.clear();
        self.form.confirm_password.clear();
        Ok(NavAction::Navigate(AuthRoute::Login))
    }

    /// Leave the code step, or the screen when already on the first step
    pub fn back(&mut self) -> Option<NavAction<AuthRoute>> {
        match self.step {
            ResetStep::EnterCode => {
                self.step = ResetStep::RequestCode;
                self.form.code.clear();
                self.form.new_password.clear();
                self.form.confirm_password.clear();
                self.submit = SubmitState::default();
                None
            }
            ResetStep::RequestCode => Some(NavAction::GoBack),
        }
    }

    pub fn sign_in_instead(&self) -> NavAction<AuthRoute> {
        NavAction::Navigate(AuthRoute::Login)
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
