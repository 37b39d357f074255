//! Configuration loading and validation for the credtool CLI.
//!
//! All values are read from environment variables. Key material is never
//! accepted as a command-line argument, keeping it out of shell history and
//! process listings.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated credtool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 256-bit credential key (64 hex chars). **Required.**
    pub credentials_secret_key: String,

    /// Hex-encoded replacement key for the `rekey` subcommand. Required only
    /// when rekeying.
    #[serde(default)]
    pub credentials_secret_key_next: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `CREDENTIALS_SECRET_KEY` is absent or empty.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build credtool configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise credtool configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.credentials_secret_key.trim().is_empty() {
            anyhow::bail!("CREDENTIALS_SECRET_KEY is required and must not be empty");
        }
        Ok(())
    }

    /// The replacement key, or an error naming the missing variable.
    ///
    /// Key length and hex validity are checked by the cipher constructor, not
    /// here.
    pub fn next_key(&self) -> Result<&str> {
        match self.credentials_secret_key_next.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => anyhow::bail!("CREDENTIALS_SECRET_KEY_NEXT is required for the rekey subcommand"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            credentials_secret_key: "ab".repeat(32),
            credentials_secret_key_next: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn default_log_level_is_info() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_key() {
        let cfg = Config {
            credentials_secret_key: "  ".into(),
            ..base_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_present_key() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn next_key_requires_the_variable() {
        assert!(base_config().next_key().is_err());
    }

    #[test]
    fn next_key_rejects_blank_value() {
        let cfg = Config {
            credentials_secret_key_next: Some(String::new()),
            ..base_config()
        };
        assert!(cfg.next_key().is_err());
    }

    #[test]
    fn next_key_returns_value_when_set() {
        let cfg = Config {
            credentials_secret_key_next: Some("cd".repeat(32)),
            ..base_config()
        };
        assert_eq!(cfg.next_key().unwrap(), "cd".repeat(32));
    }
}
