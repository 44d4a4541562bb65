//! Shared Module
//!
//! Platform-agnostic types used by the session core, the API client and the
//! desktop shell: identity and session snapshots, the dashboard's path space,
//! configuration, error types and collaborator payloads.

/// Session and identity types
pub mod user;

/// Dashboard routes
pub mod routes;

/// Shared error types
pub mod error;

/// Backend message codes and their user-facing text
pub mod messages;

/// Collaborator request/response payloads
pub mod models;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{ApiError, AuthError, SessionError};
pub use routes::Route;
pub use user::{Role, Session, SessionStatus, User};
