//! Session Manager
//!
//! Owns the store, the pipeline and the navigator, and runs the flows that
//! move the session between states: the who-am-I check, login, register and
//! logout.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;

use crate::api::ApiClient;
use crate::session::guard::RouteGuard;
use crate::session::navigator::Navigator;
use crate::session::pipeline::{ApiRequest, RequestPipeline};
use crate::session::single_flight::SingleFlight;
use crate::session::store::SessionStore;
use crate::shared::config::AppConfig;
use crate::shared::error::{ApiError, AuthError};
use crate::shared::messages::{describe_error_body, LOGIN_FAILED, REGISTER_FAILED};
use crate::shared::user::{Session, User};

/// who-am-I
pub const ME_PATH: &str = "/users/me";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REGISTER_PATH: &str = "/auth/register";

/// Username and password as sent to `/auth/login` and `/auth/register`
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.trim().is_empty() {
            return Err(AuthError::validation("username", "Username is required"));
        }
        if self.password.is_empty() {
            return Err(AuthError::validation("password", "Password is required"));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    store: SessionStore,
    pipeline: RequestPipeline,
    navigator: Arc<dyn Navigator>,
    check: SingleFlight<Session>,
}

impl SessionManager {
    /// Build a manager with a fresh `Unknown` store
    pub fn new(config: AppConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let store = SessionStore::new();
        let pipeline = RequestPipeline::new(config, store.clone(), navigator.clone())?;
        Ok(Self::from_parts(pipeline, navigator))
    }

    /// Build a manager around an existing pipeline; shares its store
    pub fn from_parts(pipeline: RequestPipeline, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                store: pipeline.store().clone(),
                pipeline,
                navigator,
                check: SingleFlight::new(),
            }),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.inner.pipeline
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        self.inner.navigator.clone()
    }

    pub fn session(&self) -> Session {
        self.inner.store.snapshot()
    }

    /// Typed client for the dashboard's CRUD endpoints
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.inner.pipeline.clone())
    }

    /// Route guard bound to this manager's store and navigator
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(
            self.inner.pipeline.config(),
            self.inner.store.clone(),
            self.inner.navigator.clone(),
        )
    }

    /// Resolve the session with `GET /users/me`.
    ///
    /// Concurrent calls share one request. Any failure ends in
    /// `Unauthenticated`. Returns the store's snapshot once the check is done.
    pub async fn check_session(&self) -> Session {
        let manager = self.clone();
        self.inner
            .check
            .run(move || {
                let ticket = manager.inner.store.begin_check();
                async move {
                    let session = manager.fetch_session().await;
                    manager.inner.store.complete_check(ticket, session);
                    manager.inner.store.snapshot()
                }
            })
            .await
    }

    /// Like [`check_session`](Self::check_session), but never joins a check
    /// that started before this call
    pub async fn recheck_session(&self) -> Session {
        if self.inner.check.in_flight() {
            self.check_session().await;
        }
        self.check_session().await
    }

    async fn fetch_session(&self) -> Session {
        match self.inner.pipeline.execute(&ApiRequest::get(ME_PATH)).await {
            Ok(response) if response.status == StatusCode::OK => match response.json::<User>() {
                Ok(user) => {
                    tracing::debug!(user_id = user.id, role = user.role.as_str(), "session resolved");
                    Session::Authenticated(user)
                }
                Err(err) => {
                    tracing::warn!(%err, "malformed who-am-I response");
                    Session::Unauthenticated
                }
            },
            Ok(response) => {
                tracing::debug!(status = response.status.as_u16(), "no active session");
                Session::Unauthenticated
            }
            Err(err) => {
                tracing::warn!(%err, "session check failed");
                Session::Unauthenticated
            }
        }
    }

    /// Sign in and resolve the new session
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let request = ApiRequest::post(LOGIN_PATH).json(credentials)?;
        let response = self.inner.pipeline.send(&request).await?;

        if !response.is_success() {
            let (code, message) = describe_error_body(&response.body, LOGIN_FAILED);
            tracing::warn!(status = response.status.as_u16(), ?code, "login rejected");
            return Err(AuthError::rejected(code, message));
        }

        tracing::info!(username = %credentials.username, "login accepted");
        let session = self.recheck_session().await;
        if session.is_authenticated() {
            Ok(session)
        } else {
            Err(AuthError::rejected(None, LOGIN_FAILED))
        }
    }

    /// Create an account; does not sign in
    pub async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        credentials.validate()?;
        let request = ApiRequest::post(REGISTER_PATH).json(credentials)?;
        let response = self.inner.pipeline.send(&request).await?;

        if response.is_success() {
            tracing::info!(username = %credentials.username, "account registered");
            return Ok(());
        }
        let (code, message) = describe_error_body(&response.body, REGISTER_FAILED);
        tracing::warn!(status = response.status.as_u16(), ?code, "registration rejected");
        Err(AuthError::rejected(code, message))
    }

    /// End the session. The store is invalidated whatever the backend says.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.inner.pipeline.send(&ApiRequest::post(LOGOUT_PATH)).await;
        self.inner.store.invalidate();
        match result {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(ApiError::status(response.status, response.text())),
            Err(err) => {
                tracing::warn!(%err, "logout request failed");
                Err(err)
            }
        }
    }
}
