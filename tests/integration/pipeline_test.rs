//! Credentialed Request Pipeline tests
//!
//! One refresh on 403, one retry, and session expiry when the refresh fails.

use std::time::Duration;

use assert_matches::assert_matches;
use finboard::session::{ApiRequest, MemoryNavigator, Navigator, SessionManager};
use finboard::shared::{ApiError, Role, Session, User};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{api, spawn_app, test_config, GatedBackend, Reply};
use crate::{assert_err, assert_ok, assert_redirects, assert_status};

#[tokio::test]
async fn test_success_passes_through_without_refresh() {
    let app = spawn_app("/accounts").await;
    app.mount_refresh(200, 0).await;
    Mock::given(method("GET"))
        .and(path(api("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": "Rent" }])))
        .expect(1)
        .mount(&app.server)
        .await;

    let response = assert_ok!(app.manager.pipeline().execute(&ApiRequest::get("/categories")).await);
    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = assert_ok!(response.json());
    assert_eq!(body[0]["name"], "Rent");
}

#[tokio::test]
async fn test_other_errors_are_returned_unchanged() {
    let app = spawn_app("/accounts").await;
    app.mount_refresh(200, 0).await;
    for (endpoint, status) in [("/boards/9", 404), ("/stats", 500), ("/users", 401)] {
        Mock::given(method("GET"))
            .and(path(api(endpoint)))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .expect(1)
            .mount(&app.server)
            .await;

        let response = assert_ok!(app.manager.pipeline().execute(&ApiRequest::get(endpoint)).await);
        assert_eq!(response.status.as_u16(), status);
        assert_eq!(response.text(), "nope");
    }
    assert_status!(app.manager.store(), Unknown);
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_forbidden_refreshes_then_retries_once() {
    let app = spawn_app("/history").await;
    app.mount_refresh(200, 1).await;
    Mock::given(method("GET"))
        .and(path(api("/histories")))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("/histories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&app.server)
        .await;

    let response = assert_ok!(app.manager.pipeline().execute(&ApiRequest::get("/histories")).await);
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.hits("/histories").await, 2);
    // A successful refresh does not touch the store
    assert_status!(app.manager.store(), Unknown);
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_retry_result_is_final_even_if_forbidden() {
    let app = spawn_app("/accounts").await;
    app.mount_refresh(200, 1).await;
    Mock::given(method("DELETE"))
        .and(path(api("/users/delete/4")))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&app.server)
        .await;

    let request = ApiRequest::delete("/users/delete/4");
    let response = assert_ok!(app.manager.pipeline().execute(&request).await);
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_failed_refresh_expires_session_and_redirects() {
    let app = spawn_app("/accounts").await;
    app.mount_refresh(401, 1).await;
    Mock::given(method("GET"))
        .and(path(api("/users")))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&app.server)
        .await;

    let result = app.manager.pipeline().execute(&ApiRequest::get("/users")).await;
    assert_err!(result, ApiError::SessionExpired);
    assert_status!(app.manager.store(), Unauthenticated);
    assert_redirects!(app.navigator, "/login");
}

#[tokio::test]
async fn test_failed_refresh_on_public_page_does_not_redirect() {
    let app = spawn_app("/register").await;
    app.mount_refresh(403, 1).await;
    Mock::given(method("GET"))
        .and(path(api("/categories")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&app.server)
        .await;

    let result = app.manager.pipeline().execute(&ApiRequest::get("/categories")).await;
    assert_err!(result, ApiError::SessionExpired);
    assert_status!(app.manager.store(), Unauthenticated);
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_failed_refresh_keeps_a_session_signed_in_meanwhile() {
    let backend = GatedBackend::start(
        ("/auth/refresh", Reply::status(401)),
        vec![("/categories", Reply::status(403))],
    )
    .await;
    let app = backend.client("/accounts");

    let pipeline = app.manager.pipeline().clone();
    let call = tokio::spawn(async move { pipeline.execute(&ApiRequest::get("/categories")).await });
    backend.held_request_arrived().await;

    // A login completes while the stale refresh is still out
    app.manager.store().set_session(Session::Authenticated(User {
        id: 4,
        username: "new".into(),
        role: Role::User,
    }));
    backend.release();

    assert_err!(assert_ok!(call.await), ApiError::SessionExpired);
    assert_status!(app.manager.store(), Authenticated);
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_signed_out_on_login_page_has_no_navigation_side_effects() {
    let app = spawn_app("/login").await;
    app.manager.store().invalidate();
    app.mount_refresh(401, 1).await;
    Mock::given(method("GET"))
        .and(path(api("/users/me")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&app.server)
        .await;

    let result = app.manager.pipeline().execute(&ApiRequest::get("/users/me")).await;
    assert_err!(result, ApiError::SessionExpired);
    assert_redirects!(app.navigator);
    assert_eq!(Navigator::current_path(&*app.navigator), "/login");
}

#[tokio::test]
async fn test_concurrent_forbidden_responses_share_one_refresh() {
    let app = spawn_app("/").await;
    Mock::given(method("POST"))
        .and(path(api("/auth/refresh")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("/categories")))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(2)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.server)
        .await;

    let pipeline = app.manager.pipeline();
    let request = ApiRequest::get("/categories");
    let (a, b) = tokio::join!(pipeline.execute(&request), pipeline.execute(&request));
    assert_eq!(assert_ok!(a).status, StatusCode::OK);
    assert_eq!(assert_ok!(b).status, StatusCode::OK);
    assert_eq!(app.hits("/auth/refresh").await, 1);
}

#[tokio::test]
async fn test_transport_error_is_not_retried() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let config = test_config(&format!("http://127.0.0.1:{}", port));

    let navigator = std::sync::Arc::new(MemoryNavigator::new("/accounts"));
    let manager = assert_ok!(SessionManager::new(config, navigator.clone()));

    let result = manager.pipeline().execute(&ApiRequest::get("/users/me")).await;
    assert_matches!(result, Err(ref err) if err.is_transport());
    assert_status!(manager.store(), Unknown);
    assert_redirects!(navigator);
}

#[tokio::test]
async fn test_query_and_body_are_sent() {
    let app = spawn_app("/").await;
    Mock::given(method("POST"))
        .and(path(api("/operations")))
        .and(wiremock::matchers::query_param("dry", "1"))
        .and(wiremock::matchers::body_json(json!({ "board_id": 3 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;

    let request = assert_ok!(ApiRequest::post("/operations")
        .query("dry", 1)
        .json(&json!({ "board_id": 3 })));
    let response = assert_ok!(app.manager.pipeline().execute(&request).await);
    assert!(response.is_success());
}
