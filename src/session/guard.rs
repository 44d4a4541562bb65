//! Route Guard
//!
//! Decides, from the session and the current path, whether a page renders,
//! waits, or is replaced by the login page:
//!
//! | session           | public page    | protected page                  |
//! |-------------------|----------------|---------------------------------|
//! | `Unknown`         | loading        | loading                         |
//! | `Authenticated`   | render, bare   | render with navbar (+ sidebar)  |
//! | `Unauthenticated` | render, bare   | redirect to login               |
//!
//! The guard has no timers. It re-evaluates when the store changes (see
//! [`RouteGuard::watch`]) or when the path changes ([`RouteGuard::on_navigate`]).

use std::sync::Arc;

use crate::session::navigator::Navigator;
use crate::session::store::{SessionStore, SubscriptionId};
use crate::shared::config::AppConfig;
use crate::shared::routes::Route;
use crate::shared::user::Session;

/// Navigation chrome drawn around a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chrome {
    pub navbar: bool,
    pub admin_sidebar: bool,
}

impl Chrome {
    pub const NONE: Chrome = Chrome {
        navbar: false,
        admin_sidebar: false,
    };

    fn for_session(session: &Session) -> Self {
        Chrome {
            navbar: true,
            admin_sidebar: session.is_admin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not resolved yet; draw a placeholder and do not redirect
    Loading,
    Render { route: Route, chrome: Chrome },
    Redirect { to: String },
}

impl GuardDecision {
    pub fn chrome(&self) -> Chrome {
        match self {
            GuardDecision::Render { chrome, .. } => *chrome,
            _ => Chrome::NONE,
        }
    }
}

pub struct RouteGuard {
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    config: AppConfig,
}

impl RouteGuard {
    pub fn new(config: &AppConfig, store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            config: config.clone(),
        }
    }

    /// Pure decision for a session and a path
    pub fn decide(&self, session: &Session, path: &str) -> GuardDecision {
        let public = self.config.is_public(path);
        match session {
            Session::Unknown => GuardDecision::Loading,
            _ if public => GuardDecision::Render {
                route: Route::parse(path),
                chrome: Chrome::NONE,
            },
            Session::Authenticated(_) => GuardDecision::Render {
                route: Route::parse(path),
                chrome: Chrome::for_session(session),
            },
            Session::Unauthenticated => GuardDecision::Redirect {
                to: self.config.login_path.clone(),
            },
        }
    }

    /// Decide for the current state and carry out any redirect
    pub fn evaluate(&self) -> GuardDecision {
        self.evaluate_with(&self.store.snapshot())
    }

    pub fn evaluate_with(&self, session: &Session) -> GuardDecision {
        let path = self.navigator.current_path();
        let decision = self.decide(session, &path);
        if let GuardDecision::Redirect { to } = &decision {
            tracing::info!(from = %path, to = %to, "protected page without a session");
            self.navigator.replace(to);
        }
        decision
    }

    /// Navigate to `path` and re-evaluate
    pub fn on_navigate(&self, path: &str) -> GuardDecision {
        self.navigator.push(path);
        self.evaluate()
    }

    /// Re-evaluate on every store change for as long as the guard is alive
    pub fn watch(self: &Arc<Self>) -> SubscriptionId {
        let guard = Arc::downgrade(self);
        self.store.subscribe(move |session| {
            if let Some(guard) = guard.upgrade() {
                guard.evaluate_with(session);
            }
        })
    }
}
