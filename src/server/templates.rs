//! HTML templates for the web UI.
//!
//! Templates are embedded at compile time using `include_str!`.

/// Single-page UI: task form, filtered list, and insights panel.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
