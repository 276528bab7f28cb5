//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Portal identity and QR contract
    #[serde(default)]
    pub portal: PortalConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.portal.domain.trim().is_empty() {
            return Err(AppError::validation("portal.domain is empty"));
        }
        if self.portal.key_param.trim().is_empty() {
            return Err(AppError::validation("portal.key_param is empty"));
        }
        if self.portal.transaction_param.trim().is_empty() {
            return Err(AppError::validation("portal.transaction_param is empty"));
        }
        if self.portal.key_param == self.portal.transaction_param {
            return Err(AppError::validation(
                "portal.key_param and portal.transaction_param must differ",
            ));
        }
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Where scanned tokens must point and what they must carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Domain fragment the endpoint host must contain
    #[serde(default = "defaults::domain")]
    pub domain: String,

    /// Query parameter holding the access key
    #[serde(default = "defaults::key_param")]
    pub key_param: String,

    /// Query parameter holding the transaction (date-usage) token
    #[serde(default = "defaults::transaction_param")]
    pub transaction_param: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            domain: defaults::domain(),
            key_param: defaults::key_param(),
            transaction_param: defaults::transaction_param(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for portal requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Ask intermediaries not to serve cached responses
    #[serde(default = "defaults::no_cache")]
    pub no_cache: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            no_cache: defaults::no_cache(),
        }
    }
}

mod defaults {
    // Portal defaults
    pub fn domain() -> String {
        "edubox.com.br".into()
    }
    pub fn key_param() -> String {
        "key".into()
    }
    pub fn transaction_param() -> String {
        "dtu".into()
    }

    // Client defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Mobile) FrequenciaMedicina/1.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn no_cache() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.portal.domain, "edubox.com.br");
        assert_eq!(config.portal.key_param, "key");
        assert_eq!(config.portal.transaction_param, "dtu");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [client]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.client.timeout_secs, 5);
        assert!(config.client.no_cache);
        assert_eq!(config.portal.domain, "edubox.com.br");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.client.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_same_params() {
        let mut config = Config::default();
        config.portal.transaction_param = "key".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("nope.toml"));
        assert_eq!(config.portal.domain, "edubox.com.br");
    }

    #[test]
    fn test_load_error_kinds() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(tmp.path().join("nope.toml")),
            Err(AppError::Config(_))
        ));

        let path = tmp.path().join("broken.toml");
        fs::write(&path, "[client]\ntimeout_secs = \"soon\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(AppError::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[portal]\ndomain = \"portal.example.org\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.portal.domain, "portal.example.org");
        assert_eq!(config.portal.key_param, "key");
    }
}
