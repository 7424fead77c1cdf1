//! Configuration types and structures.

use crate::db::insights::DEFAULT_DUE_SOON_DAYS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub insights: InsightsConfig,
}

/// HTTP server and storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to bind (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin (default: true).
    #[serde(default = "default_cors")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("task-tracker/tasks.db")
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors() -> bool {
    true
}

/// Insight generator configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Days after today still counted as "due soon" (default: 7).
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: u32,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            due_soon_days: default_due_soon_days(),
        }
    }
}

fn default_due_soon_days() -> u32 {
    DEFAULT_DUE_SOON_DAYS
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}
