//! Login, register and logout against the mock backend

use finboard::session::Credentials;
use finboard::shared::messages::{localize, LOGIN_FAILED, REGISTER_FAILED};
use finboard::shared::{ApiError, AuthError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{api, error_json, spawn_app, user_json, TestApp};
use crate::{assert_err, assert_ok, assert_status};

async fn mount_login(app: &TestApp, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(api("/auth/login")))
        .respond_with(response)
        .mount(&app.server)
        .await;
}

fn rejected_message(err: AuthError) -> (Option<String>, String) {
    match err {
        AuthError::Rejected { code, message } => (code, message),
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_accepted_then_checked() {
    let app = spawn_app("/login").await;
    Mock::given(method("POST"))
        .and(path(api("/auth/login")))
        .and(body_json(json!({ "username": "olena", "password": "pa55" })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.server)
        .await;
    app.mount_me(user_json(2, "olena", "USER")).await;

    let session = assert_ok!(app.manager.login(&Credentials::new("olena", "pa55")).await);
    assert_eq!(session.user().map(|u| u.username.as_str()), Some("olena"));
    assert_status!(app.manager.store(), Authenticated);
}

#[tokio::test]
async fn test_login_known_code_is_localized() {
    let app = spawn_app("/login").await;
    mount_login(
        &app,
        ResponseTemplate::new(401).set_body_json(error_json("INVALID_USERNAME_OR_PASSWORD")),
    )
    .await;

    let err = app
        .manager
        .login(&Credentials::new("olena", "wrong"))
        .await
        .unwrap_err();
    let (code, message) = rejected_message(err);
    assert_eq!(code.as_deref(), Some("INVALID_USERNAME_OR_PASSWORD"));
    assert_eq!(Some(message.as_str()), localize("INVALID_USERNAME_OR_PASSWORD"));
    assert_status!(app.manager.store(), Unknown);
}

#[tokio::test]
async fn test_login_unmapped_code_shows_raw_message() {
    let app = spawn_app("/login").await;
    mount_login(
        &app,
        ResponseTemplate::new(400).set_body_json(error_json("Account locked")),
    )
    .await;

    let err = app.manager.login(&Credentials::new("a", "b")).await.unwrap_err();
    assert_eq!(err.user_message(), "Account locked");
}

#[tokio::test]
async fn test_login_without_body_uses_fallback() {
    let app = spawn_app("/login").await;
    mount_login(&app, ResponseTemplate::new(500)).await;

    let err = app.manager.login(&Credentials::new("a", "b")).await.unwrap_err();
    assert_eq!(rejected_message(err), (None, LOGIN_FAILED.to_string()));
}

#[tokio::test]
async fn test_login_forbidden_does_not_refresh() {
    let app = spawn_app("/login").await;
    app.mount_refresh(200, 0).await;
    mount_login(&app, ResponseTemplate::new(403)).await;

    let result = app.manager.login(&Credentials::new("a", "b")).await;
    assert_err!(result, AuthError::Rejected { .. });
}

#[tokio::test]
async fn test_login_validation_sends_nothing() {
    let app = spawn_app("/login").await;
    Mock::given(method("POST"))
        .and(path(api("/auth/login")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let result = app.manager.login(&Credentials::new("", "secret")).await;
    assert_err!(result, AuthError::Validation { .. });
}

#[tokio::test]
async fn test_login_accepted_but_no_session() {
    let app = spawn_app("/login").await;
    mount_login(&app, ResponseTemplate::new(200)).await;
    app.mount_me_status(401).await;

    let err = app.manager.login(&Credentials::new("a", "b")).await.unwrap_err();
    assert_eq!(err.user_message(), LOGIN_FAILED);
    assert_status!(app.manager.store(), Unauthenticated);
}

#[tokio::test]
async fn test_register_success_does_not_sign_in() {
    let app = spawn_app("/register").await;
    Mock::given(method("POST"))
        .and(path(api("/auth/register")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.server)
        .await;

    assert_ok!(app.manager.register(&Credentials::new("new", "pw")).await);
    assert_status!(app.manager.store(), Unknown);
}

#[tokio::test]
async fn test_register_conflict_is_localized() {
    let app = spawn_app("/register").await;
    Mock::given(method("POST"))
        .and(path(api("/auth/register")))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_json("USER_ALREADY_EXISTS")))
        .mount(&app.server)
        .await;

    let err = app.manager.register(&Credentials::new("dup", "pw")).await.unwrap_err();
    assert_eq!(Some(err.user_message().as_str()), localize("USER_ALREADY_EXISTS"));
}

#[tokio::test]
async fn test_register_garbage_body_uses_fallback() {
    let app = spawn_app("/register").await;
    Mock::given(method("POST"))
        .and(path(api("/auth/register")))
        .respond_with(ResponseTemplate::new(400).set_body_string("<html>"))
        .mount(&app.server)
        .await;

    let err = app.manager.register(&Credentials::new("x", "pw")).await.unwrap_err();
    assert_eq!(err.user_message(), REGISTER_FAILED);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = spawn_app("/").await;
    app.mount_me(user_json(1, "root", "ADMIN")).await;
    Mock::given(method("POST"))
        .and(path(api("/auth/logout")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    app.manager.check_session().await;
    assert_status!(app.manager.store(), Authenticated);

    assert_ok!(app.manager.logout().await);
    assert_status!(app.manager.store(), Unauthenticated);
}

#[tokio::test]
async fn test_logout_failure_still_clears_session() {
    let app = spawn_app("/").await;
    app.mount_me(user_json(1, "root", "ADMIN")).await;
    Mock::given(method("POST"))
        .and(path(api("/auth/logout")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    app.manager.check_session().await;
    let result = app.manager.logout().await;
    assert_err!(result, ApiError::Status { .. });
    assert_status!(app.manager.store(), Unauthenticated);
}
