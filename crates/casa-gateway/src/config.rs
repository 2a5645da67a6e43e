//! Application configuration.

use std::path::PathBuf;

use anyhow::{bail, Context};
use casa_model::artifacts::ArtifactPaths;
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "CASA_CONFIG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name
    pub name: String,
    /// Directory relative artifact paths are resolved against
    pub base_dir: PathBuf,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Artifact file locations
    pub artifacts: ArtifactPaths,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "casa".to_string(),
            base_dir: PathBuf::from("."),
            server: ServerConfig::default(),
            artifacts: ArtifactPaths::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Worker threads, one per core when unset
    pub workers: Option<usize>,
    /// Maximum accepted JSON body in bytes
    pub json_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            workers: None,
            json_limit: 256 * 1024,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
    /// Write `app.log` here instead of stdout
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `CASA_HOST`, `CASA_PORT` and `CASA_LOG_DIR` when set
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("CASA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CASA_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("CASA_PORT is not a valid port: {port:?}"))?;
        }
        if let Some(dir) = lookup("CASA_LOG_DIR") {
            self.logging.log_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if self.server.workers == Some(0) {
            bail!("server.workers must be at least 1");
        }
        if self.server.json_limit == 0 {
            bail!("server.json_limit must be positive");
        }
        Ok(())
    }

    /// Artifact paths resolved against `base_dir`
    #[must_use]
    pub fn artifact_paths(&self) -> ArtifactPaths {
        self.artifacts.rooted_at(&self.base_dir)
    }
}
