//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Local cache (meal plan, theme, grocery checklist)
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

fn default_cache_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("mealwise").to_string_lossy().to_string())
        .unwrap_or_else(|| "./mealwise_data".to_string())
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

impl CacheConfig {
    /// Cache directory with a leading `~/` expanded
    pub fn path(&self) -> PathBuf {
        match (self.dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.dir),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        config.normalize();

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("mealwise").join("config.toml")),
            Some(PathBuf::from("./mealwise.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(url) = lookup("MEALWISE_API_URL") {
            self.api.url = url;
        }
        if let Some(timeout) = lookup("MEALWISE_API_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        // Cache overrides
        if let Some(dir) = lookup("MEALWISE_CACHE_DIR") {
            self.cache.dir = dir;
        }

        // Logging overrides
        if let Some(level) = lookup("MEALWISE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MEALWISE_LOG_FORMAT") {
            self.logging.format = format;
        }

        self.normalize();
    }

    fn normalize(&mut self) {
        let trimmed = self.api.url.trim_end_matches('/').len();
        self.api.url.truncate(trimmed);
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Mealwise Configuration
#
# Environment variables override these settings:
# - MEALWISE_API_URL
# - MEALWISE_API_TIMEOUT
# - MEALWISE_CACHE_DIR
# - MEALWISE_LOG_LEVEL
# - MEALWISE_LOG_FORMAT

[api]
# Backend REST API base URL
url = "http://localhost:5000/api"

# Request timeout in seconds
request_timeout_secs = 30

[cache]
# Directory for locally cached meal plans, theme and grocery checklist
dir = "~/.local/share/mealwise"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/mealwise/mealwise.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.url, "http://localhost:5000/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.url, "http://localhost:5000/api");
        assert_eq!(config.cache.dir, "~/.local/share/mealwise");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nurl = \"https://api.mealwise.app/\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.url, "https://api.mealwise.app");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nurl = 1").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_cache_path_expands_home() {
        let cache = CacheConfig {
            dir: "/var/cache/mealwise".to_string(),
        };
        assert_eq!(cache.path(), PathBuf::from("/var/cache/mealwise"));

        if let Some(home) = dirs::home_dir() {
            let cache = CacheConfig {
                dir: "~/.mw".to_string(),
            };
            assert_eq!(cache.path(), home.join(".mw"));
        }
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MEALWISE_API_URL", "http://10.0.0.2:8080/"),
            ("MEALWISE_API_TIMEOUT", "not-a-number"),
            ("MEALWISE_CACHE_DIR", "/tmp/mw"),
            ("MEALWISE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.url, "http://10.0.0.2:8080");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.cache.dir, "/tmp/mw");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }
}
