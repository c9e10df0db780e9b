//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (highest to lowest):
//!
//! 1. Environment variables
//! 2. `.sql-param-lint.toml` in current directory
//! 3. `~/.config/sql-param-lint/config.toml`
//! 4. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [checks]
//! disabled = ["SP003"]
//!
//! [checks.severity]
//! SP001 = "error"
//! SP002 = "info"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_PARAM_LINT_DISABLED` | Comma-separated check IDs to disable |
//! | `SQL_PARAM_LINT_FORMAT` | Default output format (handled by the CLI) |

use std::{collections::HashMap, env, fs, path::PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub checks: ChecksConfig
}

/// Checks configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChecksConfig {
    /// Disabled check IDs
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Severity overrides (check_id -> severity)
    #[serde(default)]
    pub severity: HashMap<String, String>
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        // Try to load from home directory config
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-param-lint")
                .join("config.toml");

            if home_config.exists() {
                let content = fs::read_to_string(&home_config)
                    .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
                config = toml::from_str(&content)
                    .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
            }
        }

        // Try to load from current directory config (overrides home config)
        let local_config = PathBuf::from(".sql-param-lint.toml");
        if local_config.exists() {
            let content = fs::read_to_string(&local_config)
                .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
            config = toml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
        }

        // Override with environment variables
        if let Ok(disabled) = env::var("SQL_PARAM_LINT_DISABLED") {
            config.checks.disabled.extend(
                disabled
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            );
        }

        Ok(config)
    }
}
