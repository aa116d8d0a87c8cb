//! Session lifecycle: restore, sign in, sign out, password reset

mod helpers;

use std::sync::Arc;

use assert_matches::assert_matches;
use helpers::*;
use trip_planner::database::DatabaseService;
use trip_planner::services::SessionTokenStore;
use trip_planner::state::{AppContext, SessionPhase};
use trip_planner::TripPlannerError;

#[tokio::test]
async fn test_session_starts_initializing_and_restores_signed_out() {
    let ctx = TestContext::new();
    assert_eq!(ctx.app.session.snapshot().phase, SessionPhase::Initializing);

    ctx.app.session.initialize().await.expect("initialize");
    let state = ctx.app.session.snapshot();
    assert_eq!(state.phase, SessionPhase::Unauthenticated);
    assert!(state.user.is_none());
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_garbage_token_fails_closed() {
    let ctx = TestContext::new();
    ctx.token_store.save("not-a-token").await.unwrap();

    ctx.app.session.initialize().await.expect("initialize");
    assert_eq!(ctx.app.session.snapshot().phase, SessionPhase::Unauthenticated);
    assert_eq!(ctx.token_store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_session_restored_from_persisted_token() {
    let ctx = TestContext::new();
    let user = ctx.signed_in("Owner", OWNER_EMAIL).await;
    assert!(ctx.token_store.load().await.unwrap().is_some());

    // Same token store, fresh process
    let database = DatabaseService::new(ctx.auth_repo.clone(), ctx.trip_repo.clone());
    let restarted = AppContext::new(ctx.app.settings.clone(), database, ctx.token_store.clone());
    restarted.session.initialize().await.expect("initialize");

    let state = restarted.session.snapshot();
    assert!(state.is_authenticated());
    assert_eq!(state.user_id(), Some(user.id.as_str()));
}

#[tokio::test]
async fn test_failed_login_reports_error_and_stays_signed_out() {
    let ctx = TestContext::new();
    ctx.app.session.initialize().await.unwrap();
    ctx.register("Owner", OWNER_EMAIL).await;

    let result = ctx.app.session.login(OWNER_EMAIL, "wrong-password").await;
    assert_matches!(result, Err(TripPlannerError::Authentication(_)));

    let state = ctx.app.session.snapshot();
    assert_eq!(state.phase, SessionPhase::Unauthenticated);
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_login_is_case_insensitive_on_email() {
    let ctx = TestContext::new();
    ctx.register("Owner", OWNER_EMAIL).await;

    let user = ctx
        .app
        .session
        .login("  OWNER@Example.com ", TEST_PASSWORD)
        .await
        .expect("login");
    assert_eq!(user.email, OWNER_EMAIL);
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let ctx = TestContext::new();
    ctx.app.session.initialize().await.unwrap();
    ctx.register("Owner", OWNER_EMAIL).await;

    assert_eq!(ctx.app.session.snapshot().phase, SessionPhase::Unauthenticated);
    assert_eq!(ctx.auth_repo.user_count().await, 1);
}

#[tokio::test]
async fn test_logout_twice_is_harmless() {
    let ctx = TestContext::new();
    ctx.signed_in("Owner", OWNER_EMAIL).await;

    ctx.app.session.logout().await.expect("first logout");
    ctx.app.session.logout().await.expect("second logout");

    let state = ctx.app.session.snapshot();
    assert_eq!(state.phase, SessionPhase::Unauthenticated);
    assert!(state.user.is_none());
    assert_eq!(ctx.token_store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_trip_store() {
    let ctx = TestContext::new();
    let owner = ctx.signed_in("Owner", OWNER_EMAIL).await;
    let trip = ctx.create_trip(&owner, "Summer in Rome", "Rome, Italy").await;
    assert!(ctx.app.store.trip(&trip.id).await.is_some());

    ctx.app.session.logout().await.unwrap();
    assert!(ctx.app.store.trip(&trip.id).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_second_operation_while_pending_is_busy() {
    let ctx = TestContext::with_latency(500);
    ctx.register("Owner", OWNER_EMAIL).await;

    let session = Arc::clone(&ctx.app.session);
    let pending = tokio::spawn(async move { session.login(OWNER_EMAIL, TEST_PASSWORD).await });
    tokio::task::yield_now().await;

    assert!(ctx.app.session.is_busy());
    assert!(ctx.app.session.snapshot().is_loading);
    let second = ctx.app.session.forgot_password(OWNER_EMAIL).await;
    assert_matches!(second, Err(TripPlannerError::Busy));

    let user = pending.await.unwrap().expect("first login completes");
    assert_eq!(ctx.app.session.snapshot().user_id(), Some(user.id.as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_logout_during_login_drops_the_late_result() {
    let ctx = TestContext::with_latency(500);
    ctx.register("Owner", OWNER_EMAIL).await;
    ctx.app.session.initialize().await.unwrap();

    let session = Arc::clone(&ctx.app.session);
    let pending = tokio::spawn(async move { session.login(OWNER_EMAIL, TEST_PASSWORD).await });
    tokio::task::yield_now().await;

    ctx.app.session.logout().await.unwrap();
    let result = pending.await.unwrap();
    assert_matches!(result, Err(TripPlannerError::Cancelled));

    assert_eq!(ctx.app.session.snapshot().phase, SessionPhase::Unauthenticated);
    assert_eq!(ctx.token_store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let ctx = TestContext::new();
    ctx.register("Owner", OWNER_EMAIL).await;
    let session = &ctx.app.session;

    session.forgot_password(OWNER_EMAIL).await.expect("send code");
    let code = ctx.auth_repo.pending_reset_code(OWNER_EMAIL).await.expect("pending code");
    assert_eq!(code.len(), 6);

    session
        .reset_password(&code, "brand-new-secret", OWNER_EMAIL)
        .await
        .expect("reset");
    assert!(ctx.auth_repo.pending_reset_code(OWNER_EMAIL).await.is_none());

    assert_matches!(
        session.login(OWNER_EMAIL, TEST_PASSWORD).await,
        Err(TripPlannerError::Authentication(_))
    );
    session
        .login(OWNER_EMAIL, "brand-new-secret")
        .await
        .expect("login with new password");
}

#[tokio::test]
async fn test_wrong_reset_code_consumes_the_pending_code() {
    let ctx = TestContext::new();
    ctx.register("Owner", OWNER_EMAIL).await;
    let session = &ctx.app.session;

    session.forgot_password(OWNER_EMAIL).await.unwrap();
    let code = ctx.auth_repo.pending_reset_code(OWNER_EMAIL).await.unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    assert_matches!(
        session.reset_password(wrong, "brand-new-secret", OWNER_EMAIL).await,
        Err(TripPlannerError::Authentication(_))
    );
    // The right code no longer works either
    assert_matches!(
        session.reset_password(&code, "brand-new-secret", OWNER_EMAIL).await,
        Err(TripPlannerError::Authentication(_))
    );
}

#[tokio::test]
async fn test_forgot_password_for_unknown_account() {
    let ctx = TestContext::new();
    let result = ctx.app.session.forgot_password(STRANGER_EMAIL).await;
    assert_matches!(result, Err(TripPlannerError::Authentication(msg)) if msg == "No account found with this email");
}
