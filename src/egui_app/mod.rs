//! egui Native Desktop App Module
//!
//! A thin desktop shell around the session core. The route guard decides what
//! the central panel shows; the navbar and the admin sidebar follow the
//! guard's chrome.
//!
//! # Module Structure
//!
//! ```text
//! egui_app/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── state/          - AppState: runtime, session manager, page state and drafts
//! ├── theme/          - Colors and frame builders
//! └── views/          - Top bar, sidebar, auth forms, dashboard, board and finance pages
//! ```
//!
//! # Example
//!
//! ```text
//! cargo run --bin finboard_app
//! ```

pub mod state;
pub mod theme;
pub mod views;

pub use state::{AppState, StartupError};
