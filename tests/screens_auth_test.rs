//! Signed-out flow driven through the screens and the root router

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use trip_planner::navigation::{AuthRoute, MainTab, NavAction, RootRouter, RootState, Route, TripsRoute};
use trip_planner::screens::auth::{ForgotPasswordScreen, LoginScreen, RegisterScreen, ResetStep, WelcomeScreen};
use trip_planner::screens::profile::ProfileScreen;
use trip_planner::TripPlannerError;

fn router_for(ctx: &TestContext) -> RootRouter {
    RootRouter::new(ctx.app.session.subscribe(), &ctx.app.settings.app.deep_link_scheme)
}

#[tokio::test]
async fn test_router_shows_loading_until_session_initialized() {
    let ctx = TestContext::new();
    let mut router = router_for(&ctx);
    assert_eq!(*router.state(), RootState::Loading);

    ctx.app.session.initialize().await.unwrap();
    assert!(router.sync());
    let auth = router.auth().expect("auth tree mounted");
    assert_eq!(*auth.current(), AuthRoute::Welcome);
}

#[tokio::test]
async fn test_welcome_register_login_round_trip() {
    let ctx = TestContext::new();
    let mut router = router_for(&ctx);
    ctx.app.session.initialize().await.unwrap();
    router.sync();

    let welcome = WelcomeScreen::new(&ctx.app.settings.app.name);
    assert_eq!(welcome.tagline(), "Plan and share your trips with friends and family");
    router.apply_auth(welcome.create_account());
    assert_eq!(router.auth().unwrap().current().title(), "Create Account");

    let mut register = RegisterScreen::new(ctx.app.session.clone());
    register.form.name = "Owner".to_string();
    register.form.email = OWNER_EMAIL.to_string();
    register.form.password = TEST_PASSWORD.to_string();
    register.form.confirm_password = "password124".to_string();
    assert_matches!(register.submit().await, Err(TripPlannerError::Validation(_)));
    assert_eq!(register.submit.error.as_deref(), Some("Passwords do not match"));
    assert!(!register.submit.submitting);

    register.form.confirm_password = TEST_PASSWORD.to_string();
    let action = register.submit().await.expect("register");
    assert_eq!(action, NavAction::Navigate(AuthRoute::Login));
    assert_eq!(register.form.email, OWNER_EMAIL);
    assert!(register.form.password.is_empty());
    router.apply_auth(action);
    assert_eq!(*router.auth().unwrap().current(), AuthRoute::Login);

    let mut login = LoginScreen::new(ctx.app.session.clone());
    login.email = OWNER_EMAIL.to_string();
    login.password = TEST_PASSWORD.to_string();
    assert!(login.can_submit());
    login.submit().await.expect("login");
    assert!(login.password.is_empty());

    // The router follows the session on its own
    assert!(router.sync());
    let tabs = router.main().expect("main tree mounted");
    assert_eq!(tabs.active(), MainTab::Trips);
    assert_eq!(*tabs.trips().current(), TripsRoute::TripsList);
}

#[tokio::test]
async fn test_login_form_errors_are_inline() {
    let ctx = TestContext::new();
    let mut login = LoginScreen::new(ctx.app.session.clone());

    assert_matches!(login.submit().await, Err(TripPlannerError::Validation(_)));
    assert_eq!(login.submit.error.as_deref(), Some("Please enter your email"));

    login.email = "owner".to_string();
    login.password = TEST_PASSWORD.to_string();
    login.submit().await.unwrap_err();
    assert_eq!(login.submit.error.as_deref(), Some("Please enter a valid email"));

    login.email = OWNER_EMAIL.to_string();
    login.submit().await.unwrap_err();
    assert_eq!(login.submit.error.as_deref(), Some("Invalid email or password"));
    assert!(!login.submit.submitting);
}

#[tokio::test]
async fn test_login_links() {
    let ctx = TestContext::new();
    let login = LoginScreen::new(ctx.app.session.clone());
    assert_eq!(login.forgot_password(), NavAction::Navigate(AuthRoute::ForgotPassword));
    assert_eq!(login.create_account(), NavAction::Navigate(AuthRoute::Register));

    let mut login = login;
    login.toggle_password_visibility();
    assert!(login.password_visible);

    let register = RegisterScreen::new(ctx.app.session.clone());
    assert_eq!(register.sign_in_instead(), NavAction::Navigate(AuthRoute::Login));
    let forgot = ForgotPasswordScreen::new(ctx.app.session.clone());
    assert_eq!(forgot.sign_in_instead(), NavAction::Navigate(AuthRoute::Login));
}

#[tokio::test]
async fn test_forgot_password_screen_two_steps() {
    let ctx = TestContext::new();
    ctx.register("Owner", OWNER_EMAIL).await;
    let mut screen = ForgotPasswordScreen::new(ctx.app.session.clone());
    assert_eq!(screen.step(), ResetStep::RequestCode);

    screen.form.email = OWNER_EMAIL.to_string();
    screen.send_code().await.expect("send code");
    assert_eq!(screen.step(), ResetStep::EnterCode);
    assert_eq!(screen.submit.success.as_deref(), Some("Verification code sent to your email"));

    // Back from the code step stays on the screen
    assert_eq!(screen.back(), None);
    assert_eq!(screen.step(), ResetStep::RequestCode);
    screen.send_code().await.unwrap();

    let code = ctx.auth_repo.pending_reset_code(OWNER_EMAIL).await.unwrap();
    screen.form.code = code;
    screen.form.new_password = "short".to_string();
    screen.form.confirm_password = "short".to_string();
    screen.reset_password().await.unwrap_err();
    assert_eq!(
        screen.submit.error.as_deref(),
        Some("Password must be at least 8 characters")
    );

    screen.form.new_password = "brand-new-secret".to_string();
    screen.form.confirm_password = "brand-new-secret".to_string();
    let action = screen.reset_password().await.expect("reset");
    assert_eq!(action, NavAction::Navigate(AuthRoute::Login));
    assert_eq!(screen.submit.success.as_deref(), Some("Password reset successful"));

    ctx.app
        .session
        .login(OWNER_EMAIL, "brand-new-secret")
        .await
        .expect("login with new password");
}

#[tokio::test]
async fn test_deep_link_opened_before_sign_in_is_applied_after() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", OWNER_EMAIL).await;
    let trip = ctx.create_trip(&owner, "Summer in Rome", "Rome, Italy").await;
    let mut router = router_for(&ctx);
    ctx.app.session.initialize().await.unwrap();
    router.sync();

    let link = format!("tripplanner://trips/{}/days/1", trip.id);
    router.open_deep_link(&link).expect("valid link");
    assert!(router.pending_link().is_some());
    assert!(router.auth().is_some());

    ctx.sign_in(OWNER_EMAIL).await;
    router.sync();
    let trips = router.main().unwrap().trips();
    assert_eq!(
        *trips.current(),
        TripsRoute::DayDetails {
            trip_id: trip.id.clone(),
            day_index: 1
        }
    );
    assert_eq!(trips.depth(), 3);
    assert!(router.pending_link().is_none());
}

#[tokio::test]
async fn test_sign_out_from_profile_returns_to_welcome() {
    let ctx = TestContext::new();
    let mut router = router_for(&ctx);
    let owner = ctx.signed_in("Owner", OWNER_EMAIL).await;
    ctx.create_trip(&owner, "Summer in Rome", "Rome, Italy").await;
    router.sync();
    router.main_mut().unwrap().select(MainTab::Profile);
    assert_eq!(router.main().unwrap().title(), "Profile");

    let mut profile = ProfileScreen::new(ctx.app.clone());
    profile.load().await.unwrap();
    assert_eq!(profile.user().map(|u| u.name), Some("Owner".to_string()));
    assert!(profile.member_since().unwrap().starts_with("Member since "));
    assert_eq!(profile.stat_items()[0].value, 1);

    profile.logout().await.expect("logout");
    assert!(router.changed().await.unwrap());
    assert_eq!(*router.auth().unwrap().current(), AuthRoute::Welcome);
}
