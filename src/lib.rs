//! Finboard - Main Library
//!
//! Finboard is the desktop client of a small-business finance dashboard. The
//! backend authenticates with an HTTP-only cookie; this crate keeps the
//! client's view of "who is signed in" in step with it.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no I/O
//!   - Session and user types, routes, payloads
//!   - Configuration and error types
//!   - Localized backend error messages
//!
//! - **`session`** - The session core
//!   - Session State Store with observers
//!   - Credentialed Request Pipeline (refresh once on 403)
//!   - Session Manager (who-am-I check, login, register, logout)
//!   - Route Guard
//!
//! - **`api`** - Typed client for the dashboard's CRUD endpoints
//!
//! - **`egui_app`** - Native desktop shell (`desktop` feature)
//!
//! # Feature Flags
//!
//! - **`desktop`** (default) - builds the egui shell and the `finboard_app`
//!   binary. Without it the crate is a headless library.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use finboard::session::{Credentials, MemoryNavigator, SessionManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = finboard::shared::config::load()?;
//! let navigator = Arc::new(MemoryNavigator::new("/"));
//! let manager = SessionManager::new(config, navigator)?;
//!
//! if !manager.check_session().await.is_authenticated() {
//!     manager.login(&Credentials::new("admin", "secret")).await?;
//! }
//! let _stats = manager
//!     .api()
//!     .statistics(2025, finboard::shared::models::OperationType::Expense)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Store**: `Arc<RwLock<..>>` state; observers run after the lock is released
//! - **Pipeline**: cheap to clone, one shared cookie jar per pipeline
//! - **Native**: egui is single-threaded; async work runs on a tokio runtime
//!   and reports back over a channel

/// Shared types and data structures
pub mod shared;

/// Session state, request pipeline and route guard
pub mod session;

/// Dashboard API client
pub mod api;

/// Tracing subscriber setup
pub mod logging;

/// egui native desktop app
#[cfg(feature = "desktop")]
pub mod egui_app;
