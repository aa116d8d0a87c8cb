//! Screens of the signed-out flow

pub mod forgot_password;
pub mod login;
pub mod register;
pub mod welcome;

pub use forgot_password::{ForgotPasswordScreen, ResetStep};
pub use login::LoginScreen;
pub use register::RegisterScreen;
pub use welcome::WelcomeScreen;
