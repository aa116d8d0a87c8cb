//! Welcome screen

use crate::navigation::{AuthRoute, NavAction};

pub const TAGLINE: &str = "Plan and share your trips with friends and family";

#[derive(Debug, Clone)]
pub struct WelcomeScreen {
    app_name: String,
}

impl WelcomeScreen {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn tagline(&self) -> &'static str {
        TAGLINE
    }

    pub fn sign_in(&self) -> NavAction<AuthRoute> {
        NavAction::Navigate(AuthRoute::Login)
    }

    pub fn create_account(&self) -> NavAction<AuthRoute> {
        NavAction::Navigate(AuthRoute::Register)
    }
}
