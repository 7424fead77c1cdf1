//! HTTP server module.
//!
//! Serves the JSON task API, the insights endpoint, and the single-page UI.

mod api;
pub mod templates;

pub use api::{AppState, build_router, serve};
