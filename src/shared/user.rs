//! Session and identity types
//!
//! `Session` is the client-side record of whether the user is signed in and
//! who they are. The identity only exists inside the `Authenticated` variant,
//! so a signed-in session without a user cannot be represented.

use serde::{Deserialize, Serialize};

use crate::shared::error::SessionError;

/// Role assigned to an account by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
    /// Any role this client does not know about. Never privileged.
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Other => "OTHER",
        }
    }
}

/// Identity returned by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// First letter of the username, upper-cased, for the profile badge
    pub fn initial(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Login status without the identity payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of the client session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Initial state, and the state while a session check is running
    #[default]
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

impl Session {
    /// Build a session from a status and an optional user.
    ///
    /// Fails unless `user.is_some() == (status == Authenticated)`.
    pub fn new(status: SessionStatus, user: Option<User>) -> Result<Self, SessionError> {
        match (status, user) {
            (SessionStatus::Authenticated, Some(user)) => Ok(Session::Authenticated(user)),
            (SessionStatus::Unknown, None) => Ok(Session::Unknown),
            (SessionStatus::Unauthenticated, None) => Ok(Session::Unauthenticated),
            (status, user) => Err(SessionError::Inconsistent {
                status,
                has_user: user.is_some(),
            }),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Unknown => SessionStatus::Unknown,
            Session::Authenticated(_) => SessionStatus::Authenticated,
            Session::Unauthenticated => SessionStatus::Unauthenticated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Session::Unknown)
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}
