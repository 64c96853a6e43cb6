//! Logging configuration and initialization.

use crate::ports::config_port::ConfigPort;
use tracing_subscriber::{EnvFilter, fmt};

/// `[logging]` settings. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            level: config
                .get_string("logging", "level")
                .unwrap_or(defaults.level),
            format: config
                .get_string("logging", "format")
                .unwrap_or(defaults.format),
        }
    }

    /// Installs the global subscriber, writing to stderr so command output on
    /// stdout stays clean. A second call is a no-op.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        // try_init fails only when a subscriber is already installed.
        let _ = match self.format.as_str() {
            "json" => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            _ => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
