//! Mock backend helpers for integration tests
//!
//! Every test gets its own wiremock server and a session manager pointed at
//! `<server>/api`.

use std::sync::Arc;
use std::time::Duration;

use finboard::session::{MemoryNavigator, SessionManager};
use finboard::shared::AppConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/api";

/// A mock backend plus a client wired to it
pub struct TestApp {
    pub server: MockServer,
    pub manager: SessionManager,
    pub navigator: Arc<MemoryNavigator>,
}

/// Config pointing at `base` with a short timeout
pub fn test_config(base: &str) -> AppConfig {
    AppConfig::builder()
        .api_url(format!("{}{}", base, API_PREFIX))
        .request_timeout(Duration::from_secs(5))
        .build()
        .expect("test config is valid")
}

/// Start a mock backend with the client sitting on `initial_path`
pub async fn spawn_app(initial_path: &str) -> TestApp {
    let server = MockServer::start().await;
    let navigator = Arc::new(MemoryNavigator::new(initial_path));
    let manager = SessionManager::new(test_config(&server.uri()), navigator.clone())
        .expect("client builds");
    TestApp {
        server,
        manager,
        navigator,
    }
}

/// Full path on the mock server for an API path
pub fn api(endpoint: &str) -> String {
    format!("{}{}", API_PREFIX, endpoint)
}

pub fn user_json(id: i64, username: &str, role: &str) -> Value {
    json!({ "id": id, "username": username, "role": role })
}

pub fn error_json(code: &str) -> Value {
    json!({ "message": code })
}

impl TestApp {
    /// `GET /users/me` answers with `user` from now on
    pub async fn mount_me(&self, user: Value) {
        Mock::given(method("GET"))
            .and(path(api("/users/me")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.server)
            .await;
    }

    /// `GET /users/me` answers with a bare `status` from now on
    pub async fn mount_me_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(api("/users/me")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// `POST /auth/refresh` answers with `status`, expected exactly `times` times
    pub async fn mount_refresh(&self, status: u16, times: u64) {
        Mock::given(method("POST"))
            .and(path(api("/auth/refresh")))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Requests the server has seen for `endpoint`
    pub async fn hits(&self, endpoint: &str) -> usize {
        let full = api(endpoint);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == full)
            .count()
    }
}
