//! Logging setup
//!
//! Installs a `tracing` subscriber from [`LoggingConfig`]. `RUST_LOG`, when
//! set, wins over the configured level. Output goes to stderr, or to the
//! configured file, so command output on stdout stays clean.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Filter directive for a configured level, e.g. `info` -> `mealwise=info`
fn default_directive(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => format!("mealwise={}", level),
        _ => "mealwise=warn".to_string(),
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level)));

    let json = config.format.eq_ignore_ascii_case("json");

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            let writer = Mutex::new(file);
            if json {
                tracing_subscriber::fmt::layer().json().with_writer(writer).boxed()
            } else {
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed()
            }
        }
        None => {
            if json {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .boxed()
            } else {
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .boxed()
            }
        }
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("INFO"), "mealwise=info");
        assert_eq!(default_directive(" debug "), "mealwise=debug");
        assert_eq!(default_directive("loud"), "mealwise=warn");
    }

    #[test]
    fn test_unwritable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file: Some(dir.path().join("missing").join("x.log").to_string_lossy().to_string()),
            ..Default::default()
        };
        assert!(matches!(init_logging(&config), Err(LoggingError::File { .. })));
    }
}
