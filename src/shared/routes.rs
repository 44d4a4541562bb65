//! Dashboard path space
//!
//! Maps navigated paths onto the pages of the dashboard. Which pages are
//! public is configuration; see [`AppConfig::is_public`](crate::shared::config::AppConfig::is_public).

use std::fmt;

/// Path of the login page; every forced redirect lands here
pub const LOGIN_PATH: &str = "/login";

/// Path of the registration page
pub const REGISTER_PATH: &str = "/register";

/// Pages reachable without a session unless configured otherwise
pub const DEFAULT_PUBLIC_PATHS: [&str; 2] = [LOGIN_PATH, REGISTER_PATH];

/// A page of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Admin statistics or employee finances, depending on role
    Home,
    Accounts,
    History,
    Expenses { board_id: i64 },
    Employee { employee_id: i64 },
    Login,
    Register,
    NotFound(String),
}

/// Strip the query string, fragment and trailing slashes from a path
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["accounts"] => Route::Accounts,
            ["history"] => Route::History,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["expenses", id] => match id.parse() {
                Ok(board_id) => Route::Expenses { board_id },
                Err(_) => Route::NotFound(normalized.to_string()),
            },
            ["employees", id] => match id.parse() {
                Ok(employee_id) => Route::Employee { employee_id },
                Err(_) => Route::NotFound(normalized.to_string()),
            },
            _ => Route::NotFound(normalized.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Accounts => "/accounts".to_string(),
            Route::History => "/history".to_string(),
            Route::Expenses { board_id } => format!("/expenses/{}", board_id),
            Route::Employee { employee_id } => format!("/employees/{}", employee_id),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => REGISTER_PATH.to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
