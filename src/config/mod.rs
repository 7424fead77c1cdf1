//! Unified configuration system.
//!
//! Consolidates configuration from four tiers with field-by-field YAML merging:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/task-tracker/config.yaml`
//! 3. **User** - `~/.task-tracker/config.yaml`
//! 4. **Environment** - variables listed below
//!
//! ## Environment Variables
//! - `TASK_TRACKER_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TASK_TRACKER_PROJECT_DIR` - Project config dir (default: `./task-tracker`)
//! - `TASK_TRACKER_USER_DIR` - User config dir (default: `~/.task-tracker`)
//! - `TASK_TRACKER_DB_PATH` - Database path
//! - `TASK_TRACKER_HOST` - Bind address
//! - `TASK_TRACKER_PORT` - Listen port

mod loader;
mod types;

pub use loader::{
    ConfigLoader, ConfigPaths, ConfigTier, apply_env_overrides, deep_merge, deep_merge_all,
};
pub use types::*;
