//! Runtime configuration
//!
//! Configuration is read from TOML. Every field is optional:
//!
//! ```toml
//! log_filter = "wrapkit=debug"
//!
//! [limits]
//! max_members = 1024
//! max_alias_bytes = 64
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wrapkit_types::{Limits, Result, WrapError};

/// Default `tracing` filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration for a [`Runtime`](crate::Runtime)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Limits applied by the store and every wrapper in it
    pub limits: Limits,
    /// `tracing` filter directive used by binaries that install a subscriber
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: RuntimeConfig =
            toml::from_str(input).map_err(|e| WrapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)
            .map_err(|e| WrapError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&input)
    }

    /// Check limits against their hard caps
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        if self.log_filter.trim().is_empty() {
            return Err(WrapError::Config("log_filter must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapkit_types::constants::HARD_MAX_MEMBERS;

    #[test]
    fn test_empty_document_is_default() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_limits() {
        let config = RuntimeConfig::from_toml_str(
            r#"
log_filter = "wrapkit=debug"

[limits]
max_members = 8
"#,
        )
        .unwrap();
        assert_eq!(config.limits.max_members, 8);
        assert_eq!(config.limits.max_alias_bytes, Limits::default().max_alias_bytes);
        assert_eq!(config.log_filter, "wrapkit=debug");
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = RuntimeConfig::from_toml_str("max_depth = 3").unwrap_err();
        assert!(matches!(err, WrapError::Config(_)));
    }

    #[test]
    fn test_rejects_limits_above_hard_cap() {
        let input = format!("[limits]\nmax_members = {}", HARD_MAX_MEMBERS + 1);
        assert!(matches!(
            RuntimeConfig::from_toml_str(&input),
            Err(WrapError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_blank_filter() {
        assert!(RuntimeConfig::from_toml_str("log_filter = \"  \"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = RuntimeConfig::load("/nonexistent/wrapkit.toml").unwrap_err();
        assert!(err.to_string().contains("wrapkit.toml"));
    }
}
