//! Task Tracker Library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod logging;
pub mod server;
pub mod types;
