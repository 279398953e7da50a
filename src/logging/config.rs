use std::env;

use serde::{Deserialize, Serialize};

/// Environment variable with a filter directive that overrides
/// [`LoggingConfig::level`]. `RUST_LOG` is consulted after it.
pub const LOG_ENV: &str = "KANKRI_LOG";

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"kankri=debug"`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Filter directive to use: `KANKRI_LOG`, then `RUST_LOG`, then `level`.
    pub fn filter_directive(&self) -> String {
        env::var(LOG_ENV)
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| self.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.ansi);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LoggingConfig = serde_json::from_str(r#"{ "format": "json" }"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert!(config.ansi);
    }

    #[test]
    #[serial]
    fn test_env_overrides_level() {
        env::remove_var("RUST_LOG");
        env::set_var(LOG_ENV, "kankri=trace");
        let config = LoggingConfig::default();
        assert_eq!(config.filter_directive(), "kankri=trace");

        env::remove_var(LOG_ENV);
        assert_eq!(config.filter_directive(), "info");
    }
}
