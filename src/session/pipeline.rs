//! Credentialed Request Pipeline
//!
//! Every API call goes through [`RequestPipeline::execute`]. The credential is
//! a cookie kept by the HTTP client's jar; the pipeline never reads it.
//!
//! On `403 Forbidden` the pipeline makes exactly one recovery attempt:
//!
//! 1. `POST /auth/refresh` (shared by all callers that hit a 403 meanwhile)
//! 2. on a 2xx refresh, re-issue the original request once and return that
//!    response whatever its status
//! 3. on a failed refresh, invalidate the session, redirect to the login page
//!    unless a public page is already shown, and return
//!    [`ApiError::SessionExpired`]. A session written while the refresh was
//!    in flight (a login that finished meanwhile) is left alone.
//!
//! Every other status, and transport failures, go straight back to the caller.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::session::navigator::Navigator;
use crate::session::single_flight::SingleFlight;
use crate::session::store::SessionStore;
use crate::shared::config::AppConfig;
use crate::shared::error::ApiError;
use crate::shared::user::SessionStatus;

/// Renews the cookie credential
pub const REFRESH_PATH: &str = "/auth/refresh";

/// A request that can be re-issued unmodified
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present and non-empty
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn any status other than `expected` into [`ApiError::Status`]
    pub fn expect_status(self, expected: StatusCode) -> Result<Self, ApiError> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(ApiError::status(self.status, self.text()))
        }
    }
}

/// Result of one refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// 2xx from the refresh endpoint
    Renewed,
    /// Any other status
    Rejected(StatusCode),
    /// No response at all
    Unreachable(String),
}

impl RefreshOutcome {
    pub fn is_renewed(&self) -> bool {
        matches!(self, RefreshOutcome::Renewed)
    }
}

#[derive(Clone)]
pub struct RequestPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    http: Client,
    config: AppConfig,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    refresh: SingleFlight<RefreshOutcome>,
}

impl RequestPipeline {
    /// Build a pipeline with a cookie-keeping HTTP client
    pub fn new(
        config: AppConfig,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(http, config, store, navigator))
    }

    pub fn with_client(
        http: Client,
        config: AppConfig,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                http,
                config,
                store,
                navigator,
                refresh: SingleFlight::new(),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    /// Send a request with the ambient credential and one refresh on 403
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.send(request).await?;
        if response.status != StatusCode::FORBIDDEN {
            return Ok(response);
        }

        tracing::debug!(path = %request.path, "credential rejected, refreshing");
        let epoch = self.inner.store.epoch();
        match self.refresh().await {
            RefreshOutcome::Renewed => {
                tracing::debug!(path = %request.path, "credential renewed, retrying once");
                self.send(request).await
            }
            outcome => {
                tracing::warn!(?outcome, path = %request.path, "credential refresh failed");
                self.expire_session(epoch);
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Send a request once, with no recovery
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.inner.config.api_url(&request.path)?;
        let mut builder = self.inner.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), path = %request.path, "received response");

        Ok(ApiResponse { status, body })
    }

    /// Renew the credential, joining a refresh that is already in flight
    pub async fn refresh(&self) -> RefreshOutcome {
        let pipeline = self.clone();
        self.inner
            .refresh
            .run(move || async move { pipeline.refresh_once().await })
            .await
    }

    async fn refresh_once(&self) -> RefreshOutcome {
        match self.send(&ApiRequest::post(REFRESH_PATH)).await {
            Ok(response) if response.is_success() => RefreshOutcome::Renewed,
            Ok(response) => RefreshOutcome::Rejected(response.status),
            Err(err) => RefreshOutcome::Unreachable(err.to_string()),
        }
    }

    fn expire_session(&self, epoch: u64) {
        let store = &self.inner.store;
        if !store.invalidate_if_unchanged(epoch)
            && store.status() != SessionStatus::Unauthenticated
        {
            tracing::debug!("session replaced during refresh, keeping it");
            return;
        }
        let current = self.inner.navigator.current_path();
        if self.inner.config.is_public(&current) {
            tracing::debug!(path = %current, "already on a public page, not redirecting");
            return;
        }
        self.inner.navigator.replace(&self.inner.config.login_path);
    }
}
