//! Session core
//!
//! Keeps the client-side record of who is signed in and keeps it in step with
//! the backend.
//!
//! # Architecture
//!
//! - **`store`** - Session State Store: tri-state status + identity, observers
//! - **`pipeline`** - Credentialed Request Pipeline: one refresh on 403
//! - **`guard`** - Route Guard: render / loading / redirect
//! - **`manager`** - who-am-I check, login, register, logout
//! - **`navigator`** - navigation seam used for redirects
//! - **`single_flight`** - coalesces concurrent refreshes and checks
//!
//! # Control flow
//!
//! ```text
//! RouteGuard ──reads──▶ SessionStore ◀──writes── SessionManager::check_session
//!                                                        │
//!                                                        ▼
//!                                  RequestPipeline::execute(GET /users/me)
//!                                        │ 403
//!                                        ▼
//!                                  POST /auth/refresh ─▶ retry once
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use finboard::session::{MemoryNavigator, SessionManager};
//! use finboard::shared::AppConfig;
//!
//! # async fn example() -> Result<(), finboard::shared::ApiError> {
//! let navigator = Arc::new(MemoryNavigator::new("/"));
//! let manager = SessionManager::new(AppConfig::default(), navigator)?;
//! let guard = Arc::new(manager.guard());
//! guard.watch();
//! manager.check_session().await;
//! # Ok(())
//! # }
//! ```

pub mod guard;
pub mod manager;
pub mod navigator;
pub mod pipeline;
pub mod single_flight;
pub mod store;

pub use guard::{Chrome, GuardDecision, RouteGuard};
pub use manager::{Credentials, SessionManager};
pub use navigator::{MemoryNavigator, Navigator};
pub use pipeline::{ApiRequest, ApiResponse, RefreshOutcome, RequestPipeline};
pub use store::{SessionStore, SubscriptionId};
