//! Application configuration.

use cointrage_core::QuoteAllowList;
use cointrage_exchanges::{
    load_profiles, merge_profiles, AdapterSettings, ExchangeProfile, FailurePolicy, RefreshPolicy,
    ReqwestTransport,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quote currencies kept in listings.
    pub quotes: QuoteAllowList,
    /// Exchanges to enable; empty means all known exchanges.
    pub exchanges: Vec<String>,
    /// Extra exchange profiles (JSON array) overriding built-ins by name.
    pub profiles_path: Option<PathBuf>,
    /// Handling of a single exchange or market failing inside a batch.
    pub failure_policy: FailurePolicy,
    /// Concurrent cache misses behaviour.
    pub refresh_policy: RefreshPolicy,
    /// HTTP request timeout in milliseconds.
    pub request_timeout_ms: u64,
    pub user_agent: String,
    /// Logging level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quotes: QuoteAllowList::default(),
            exchanges: Vec::new(),
            profiles_path: None,
            failure_policy: FailurePolicy::default(),
            refresh_policy: RefreshPolicy::default(),
            request_timeout_ms: ReqwestTransport::DEFAULT_TIMEOUT.as_millis() as u64,
            user_agent: ReqwestTransport::DEFAULT_USER_AGENT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quotes.is_empty() {
            return Err(ConfigError::Invalid("quote allow-list is empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be positive".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent is empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn adapter_settings(&self) -> AdapterSettings {
        AdapterSettings {
            quotes: self.quotes.clone(),
            refresh_policy: self.refresh_policy,
        }
    }

    /// Built-in profiles overlaid with the ones from `profiles_path`.
    pub fn profiles(&self) -> Result<Vec<ExchangeProfile>, ConfigError> {
        let builtin = cointrage_exchanges::builtin_profiles();
        match &self.profiles_path {
            Some(path) => {
                let extra = load_profiles(path).map_err(|e| ConfigError::Invalid(e.to_string()))?;
                Ok(merge_profiles(builtin, extra))
            }
            None => Ok(builtin),
        }
    }
}
