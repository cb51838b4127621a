//! Loan policy and logging configuration.
//!
//! Configuration is a small JSON document. Every field is optional and
//! falls back to the library's standard policy: five books per user, a
//! fourteen-day loan period and the last hundred loan transitions kept in
//! history.
//!
//! ```json
//! {
//!   "policy": { "borrow_limit": 5, "loan_period_days": 14, "max_history_size": 100 },
//!   "logging": { "format": "text", "level": "warn" }
//! }
//! ```

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable the binary reads a config path from when `--config` is absent
pub const CONFIG_ENV_VAR: &str = "LIBRARY_CATALOG_CONFIG";

/// Upper bound on the loan period, keeps due-date arithmetic far from overflow
const MAX_LOAN_PERIOD_DAYS: u32 = 36_500;

/// Rules applied by the catalog when lending books
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoanPolicy {
    /// Maximum number of books a user may hold at once
    pub borrow_limit: usize,
    /// Days between borrowing and the due date
    pub loan_period_days: u32,
    /// Number of loan transitions kept in history
    pub max_history_size: usize,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self { borrow_limit: 5, loan_period_days: 14, max_history_size: 100 }
    }
}

impl LoanPolicy {
    /// Loan period as a duration
    #[must_use]
    pub fn loan_period(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.loan_period_days))
    }

    /// Reject values the catalog cannot operate with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.borrow_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "policy.borrow_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.loan_period_days == 0 || self.loan_period_days > MAX_LOAN_PERIOD_DAYS {
            return Err(ConfigError::Invalid {
                field: "policy.loan_period_days",
                reason: format!("must be between 1 and {MAX_LOAN_PERIOD_DAYS}"),
            });
        }
        if self.max_history_size == 0 {
            return Err(ConfigError::Invalid {
                field: "policy.max_history_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per record
    Json,
}

/// Logging settings for the interactive binary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Record format
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::Text, level: "warn".to_string() }
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lending rules
    pub policy: LoanPolicy,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate a JSON document. `origin` labels parse errors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or unknown fields and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|source| ConfigError::Parse { origin: origin.to_string(), source })?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, otherwise the
    /// errors of [`Config::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
        Self::from_json(&contents, &display)
    }

    /// Load from `path` if given, else use defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Config::load`] when a path is given.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_match_standard_policy() {
        let config = Config::default();
        assert_eq!(config.policy.borrow_limit, 5);
        assert_eq!(config.policy.loan_period_days, 14);
        assert_eq!(config.policy.max_history_size, 100);
        assert_eq!(config.policy.loan_period(), TimeDelta::days(14));
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_partial_document_fills_defaults() -> Result<(), ConfigError> {
        let config = Config::from_json(
            r#"{ "policy": { "borrow_limit": 3 }, "logging": { "format": "json" } }"#,
            "inline",
        )?;
        assert_eq!(config.policy.borrow_limit, 3);
        assert_eq!(config.policy.loan_period_days, 14);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn");
        Ok(())
    }

    #[test]
    fn test_rejects_zero_limit() {
        let result = Config::from_json(r#"{ "policy": { "borrow_limit": 0 } }"#, "inline");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "policy.borrow_limit", .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = Config::from_json(r#"{ "policy": { "borrow_limt": 2 } }"#, "inline");
        assert!(matches!(result, Err(ConfigError::Parse { ref origin, .. }) if origin == "inline"));
    }

    #[test]
    fn test_rejects_huge_loan_period() {
        let result =
            Config::from_json(r#"{ "policy": { "loan_period_days": 4000000 } }"#, "inline");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "policy.loan_period_days", .. })
        ));
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{ "policy": {{ "loan_period_days": 7 }} }}"#)?;

        let config = Config::load(file.path())?;
        assert_eq!(config.policy.loan_period(), TimeDelta::days(7));

        let explicit = Config::resolve(Some(file.path()))?;
        assert_eq!(explicit, config);
        Ok(())
    }

    #[test]
    fn test_resolve_without_path_uses_defaults() -> Result<(), ConfigError> {
        assert_eq!(Config::resolve(None)?, Config::default());
        assert!(matches!(
            Config::resolve(Some(Path::new("/definitely/not/here.json"))),
            Err(ConfigError::Read { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = Config::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
