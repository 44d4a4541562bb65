//! Tracing subscriber setup for the desktop binary and for tests.
//!
//! The filter comes from `RUST_LOG`; without it only this crate logs, at
//! `info`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "finboard=info";

/// Build the filter from `RUST_LOG`, falling back to `default`
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global fmt subscriber.
///
/// Fails if a subscriber is already installed; callers that may run twice
/// (tests) should ignore the error.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
