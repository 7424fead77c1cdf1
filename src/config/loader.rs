//! Configuration loader with tier-based merging.
//!
//! Tiers are merged field-by-field: objects merge recursively, everything else
//! is replaced by the higher tier, and `null` leaves the lower tier untouched.

use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Explicit config file; replaces the file tiers entirely.
pub const ENV_CONFIG_PATH: &str = "TASK_TRACKER_CONFIG_PATH";
pub const ENV_PROJECT_DIR: &str = "TASK_TRACKER_PROJECT_DIR";
pub const ENV_USER_DIR: &str = "TASK_TRACKER_USER_DIR";
pub const ENV_DB_PATH: &str = "TASK_TRACKER_DB_PATH";
pub const ENV_HOST: &str = "TASK_TRACKER_HOST";
pub const ENV_PORT: &str = "TASK_TRACKER_PORT";

const CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Embedded defaults (lowest priority)
    Defaults = 0,
    /// Project-level config ($CWD/task-tracker/)
    Project = 1,
    /// User-level config (~/.task-tracker/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let project_dir = std::env::var(ENV_PROJECT_DIR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("task-tracker")));

        let user_dir = std::env::var(ENV_USER_DIR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".task-tracker")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn config_file(&self, tier: ConfigTier) -> Option<PathBuf> {
        let dir = match tier {
            ConfigTier::Project => self.project_dir.as_ref(),
            ConfigTier::User => self.user_dir.as_ref(),
            ConfigTier::Defaults | ConfigTier::Environment => None,
        }?;
        Some(dir.join(CONFIG_FILE))
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    /// Config files that contributed, lowest tier first.
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers, honouring `TASK_TRACKER_CONFIG_PATH`.
    pub fn load() -> Result<Self> {
        match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load_file(path),
            Err(_) => Self::load_with_paths(ConfigPaths::discover()),
        }
    }

    /// Load a single explicit config file, then apply environment overrides.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = Config::load(&path)?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(Self {
            config,
            sources: vec![path],
        })
    }

    /// Load configuration with explicit tier directories.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        let mut layers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = Vec::new();

        for tier in [ConfigTier::Project, ConfigTier::User] {
            let Some(file) = paths.config_file(tier) else {
                continue;
            };
            if !file.exists() {
                continue;
            }
            match read_yaml(&file) {
                Ok(value) => {
                    debug!(%tier, path = %file.display(), "Loaded config tier");
                    layers.push(value);
                    sources.push(file);
                }
                Err(e) => warn!(%tier, path = %file.display(), error = %e, "Skipping unreadable config"),
            }
        }

        let merged = deep_merge_all(layers);
        let mut config: Config =
            serde_json::from_value(merged).context("merged configuration is invalid")?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

        Ok(Self { config, sources })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were merged, lowest tier first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Apply environment variable overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db_path) = lookup(ENV_DB_PATH) {
        config.server.db_path = PathBuf::from(db_path);
    }
    if let Some(host) = lookup(ENV_HOST) {
        config.server.host = host
            .parse()
            .with_context(|| format!("{} is not an IP address: {}", ENV_HOST, host))?;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.server.port = port
            .parse()
            .with_context(|| format!("{} is not a port number: {}", ENV_PORT, port))?;
    }
    Ok(())
}

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let next = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, next);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge layers in order, later layers winning.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_merge_nested_objects() {
        let base = json!({"server": {"host": "127.0.0.1", "port": 3000}, "cors": true});
        let overlay = json!({"server": {"port": 9000}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"server": {"host": "127.0.0.1", "port": 9000}, "cors": true})
        );
    }

    #[test]
    fn test_null_overlay_keeps_base() {
        let base = json!({"insights": {"due_soon_days": 7}});
        let overlay = json!({"insights": {"due_soon_days": null}});
        assert_eq!(deep_merge(base.clone(), overlay), base);
    }

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert!(loader.sources().is_empty());
        assert_eq!(loader.config().insights.due_soon_days, 7);
    }

    #[test]
    fn test_project_config_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("task-tracker");
        write_config(&project_dir, "server:\n  port: 8088\n");

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(temp.path().join("user")));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();

        assert_eq!(loader.config().server.port, 8088);
        assert!(loader.config().server.cors);
        assert_eq!(loader.sources().len(), 1);
    }

    #[test]
    fn test_user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("task-tracker");
        let user_dir = temp.path().join("user");
        write_config(
            &project_dir,
            "server:\n  port: 8088\n  cors: false\ninsights:\n  due_soon_days: 3\n",
        );
        write_config(&user_dir, "server:\n  port: 9099\n");

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));
        let config = ConfigLoader::load_with_paths(paths).unwrap().into_config();

        assert_eq!(config.server.port, 9099);
        assert!(!config.server.cors);
        assert_eq!(config.insights.due_soon_days, 3);
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB_PATH, "/tmp/other.db"),
            (ENV_HOST, "0.0.0.0"),
            (ENV_PORT, "4000"),
        ]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.server.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.server.bind_addr().to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, |k| {
            (k == ENV_PORT).then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("custom.yaml");
        std::fs::write(&file, "insights:\n  due_soon_days: 14\n").unwrap();

        let loader = ConfigLoader::load_file(&file).unwrap();
        assert_eq!(loader.config().insights.due_soon_days, 14);
        assert_eq!(loader.sources(), &[file]);
    }
}
