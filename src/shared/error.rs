//! Shared Error Types
//!
//! This module defines the error types used across the session core, the
//! collaborator API client and the desktop shell.
//!
//! # Error Categories
//!
//! - `ApiError` - Failures of a single credentialed HTTP exchange
//! - `AuthError` - Login/register failures surfaced to the user
//! - `SessionError` - Attempts to build an inconsistent session snapshot
//!
//! # Usage
//!
//! ```rust
//! use finboard::shared::error::AuthError;
//!
//! let error = AuthError::validation("username", "Username is required");
//! assert!(error.to_string().contains("username"));
//! ```
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be moved across tasks.
use reqwest::StatusCode;
use thiserror::Error;

use crate::shared::user::SessionStatus;

/// Errors produced by the credentialed request pipeline and the API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The credential expired and the one refresh attempt failed
    #[error("Session expired")]
    SessionExpired,

    /// The backend answered with a status the caller did not expect
    #[error("Request failed: {status} - {body}")]
    Status {
        /// Status code returned by the backend
        status: StatusCode,
        /// Raw response body, lossily decoded
        body: String,
    },

    /// The response body could not be decoded into the expected type
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request path could not be joined onto the configured base URL
    #[error("Invalid request path '{0}'")]
    InvalidPath(String),
}

impl ApiError {
    /// Create a status error from a code and a body
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Status code carried by the error, if any
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::SessionExpired => Some(StatusCode::FORBIDDEN),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the backend could not be reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Errors surfaced by the login/register/logout actions
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input rejected before any request was made
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The backend refused the request with a message code
    #[error("{message}")]
    Rejected {
        /// Raw message code from the backend, when one was sent
        code: Option<String>,
        /// Localized, user-facing message
        message: String,
    },

    /// Underlying HTTP failure
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new rejection error
    pub fn rejected(code: Option<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Message suitable for showing next to a form
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Api(err) => err.to_string(),
        }
    }
}

/// Errors raised when building a session snapshot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `Authenticated` without a user, or a user with any other status
    #[error("Inconsistent session: status {status:?} with user present = {has_user}")]
    Inconsistent {
        /// Requested status
        status: SessionStatus,
        /// Whether a user was supplied
        has_user: bool,
    },
}
