//! Common test utilities and helpers
//!
//! - Mock backend helpers (wiremock)
//! - A hand-rolled backend that holds one response for ordering tests
//! - Custom assertion macros

pub mod assertions;
pub mod gated_backend;
pub mod mock_server;

pub use gated_backend::{GatedBackend, Reply};
pub use mock_server::*;
