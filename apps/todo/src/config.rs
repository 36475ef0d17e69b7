//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `TODO_LOG_LEVEL` | `info` | tracing filter used when `RUST_LOG` is unset |
//! | `TODO_INITIAL_FILTER` | `All` | visibility filter at startup |
//! | `TODO_MAX_FEEDBACK_DEPTH` | `32` | nested effect dispatch limit, > 0 |
//! | `TODO_METRICS` | `true` | install the Prometheus recorder |
//! | `TODO_PROMPT` | `> ` | prompt printed before the input buffer |

use crate::types::{ParseFilterError, VisibilityFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tidy_runtime::StoreConfig;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: String,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter (trace, debug, info, warn, error, or a full directive)
    pub log_level: String,
    /// Filter the store starts with
    pub initial_filter: VisibilityFilter,
    /// Maximum depth of effect feedback per dispatch
    pub max_feedback_depth: usize,
    /// Whether to install the Prometheus recorder
    pub metrics_enabled: bool,
    /// Prompt shown in front of the task input
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            initial_filter: VisibilityFilter::All,
            max_feedback_depth: StoreConfig::DEFAULT_MAX_FEEDBACK_DEPTH,
            metrics_enabled: true,
            prompt: "> ".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Unset variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("TODO_LOG_LEVEL").unwrap_or(defaults.log_level);
        tracing_subscriber::EnvFilter::try_new(&log_level).map_err(|e| {
            ConfigError::InvalidValue {
                key: "TODO_LOG_LEVEL",
                value: log_level.clone(),
                reason: e.to_string(),
            }
        })?;

        let initial_filter = match lookup("TODO_INITIAL_FILTER") {
            Some(value) => value.parse().map_err(|e: ParseFilterError| {
                ConfigError::InvalidValue {
                    key: "TODO_INITIAL_FILTER",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.initial_filter,
        };

        let max_feedback_depth = match lookup("TODO_MAX_FEEDBACK_DEPTH") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TODO_MAX_FEEDBACK_DEPTH",
                        value,
                        reason: "expected a positive integer".to_string(),
                    });
                },
            },
            None => defaults.max_feedback_depth,
        };

        let metrics_enabled = match lookup("TODO_METRICS") {
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: "TODO_METRICS",
                value: value.clone(),
                reason: "expected true or false".to_string(),
            })?,
            None => defaults.metrics_enabled,
        };

        let prompt = lookup("TODO_PROMPT").unwrap_or(defaults.prompt);

        Ok(Self {
            log_level,
            initial_filter,
            max_feedback_depth,
            metrics_enabled,
            prompt,
        })
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_max_feedback_depth(self.max_feedback_depth)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(load(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("TODO_LOG_LEVEL", "debug,tidy_runtime=trace"),
            ("TODO_INITIAL_FILTER", "active"),
            ("TODO_MAX_FEEDBACK_DEPTH", "8"),
            ("TODO_METRICS", "false"),
            ("TODO_PROMPT", "todo$ "),
        ])
        .unwrap();

        assert_eq!(config.log_level, "debug,tidy_runtime=trace");
        assert_eq!(config.initial_filter, VisibilityFilter::Active);
        assert_eq!(config.max_feedback_depth, 8);
        assert!(!config.metrics_enabled);
        assert_eq!(config.prompt, "todo$ ");
        assert_eq!(config.store_config().max_feedback_depth, 8);
    }

    #[test]
    fn rejects_zero_depth() {
        let err = load(&[("TODO_MAX_FEEDBACK_DEPTH", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "TODO_MAX_FEEDBACK_DEPTH",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_filter() {
        let err = load(&[("TODO_INITIAL_FILTER", "Someday")]).unwrap_err();
        assert!(err.to_string().contains("TODO_INITIAL_FILTER"));
    }

    #[test]
    fn rejects_non_boolean_metrics_flag() {
        assert!(load(&[("TODO_METRICS", "maybe")]).is_err());
        assert!(load(&[("TODO_METRICS", "ON")]).unwrap().metrics_enabled);
    }

    #[test]
    fn rejects_malformed_log_filter() {
        assert!(load(&[("TODO_LOG_LEVEL", "tidy=notalevel")]).is_err());
    }
}
