//! Error types for adapter operations.

use cointrage_core::MarketPair;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure category an orchestrating layer can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Parse,
    Schema,
    UnknownMarket,
    RateLimit,
    UnknownExchange,
    Config,
}

/// Errors that can occur during adapter operations.
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    #[error("Transport failure: {message}")]
    Transport {
        /// HTTP status, absent when the request never got a response
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Unexpected response shape: {0}")]
    Schema(String),

    #[error("Unknown market {pair} on {exchange}")]
    UnknownMarket { exchange: String, pair: MarketPair },

    #[error("Rate limit exceeded on {0}")]
    RateLimit(String),

    #[error("Exchange not registered: {0}")]
    UnknownExchange(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for adapter operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        ExchangeError::Config(format!("invalid url: {}", err))
    }
}

impl ExchangeError {
    /// Non-2xx response without a more specific translation.
    pub fn status(status: u16, url: &str) -> Self {
        ExchangeError::Transport {
            status: Some(status),
            message: format!("Invalid status code received from url {}: {}", url, status),
        }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        ExchangeError::Schema(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::Transport { .. } => ErrorKind::Transport,
            ExchangeError::Parse(_) => ErrorKind::Parse,
            ExchangeError::Schema(_) => ErrorKind::Schema,
            ExchangeError::UnknownMarket { .. } => ErrorKind::UnknownMarket,
            ExchangeError::RateLimit(_) => ErrorKind::RateLimit,
            ExchangeError::UnknownExchange(_) => ErrorKind::UnknownExchange,
            ExchangeError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true if the caller may retry later with a reasonable chance of success.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExchangeError::Transport { .. } | ExchangeError::RateLimit(_)
        )
    }

    /// Returns true if the caller should skip this market and move on.
    pub fn is_skippable(&self) -> bool {
        matches!(self, ExchangeError::UnknownMarket { .. })
    }

    /// Returns true if the failure points at a broken profile or a changed
    /// exchange API rather than a runtime condition.
    pub fn is_bug(&self) -> bool {
        matches!(
            self,
            ExchangeError::Parse(_) | ExchangeError::Schema(_) | ExchangeError::Config(_)
        )
    }

    /// Suggested delay before a retry. None for failures that should not be retried.
    pub fn suggested_retry_delay(&self) -> Option<Duration> {
        match self {
            ExchangeError::RateLimit(_) => Some(Duration::from_secs(60)),
            ExchangeError::Transport { .. } => Some(Duration::from_secs(5)),
            ExchangeError::Parse(_)
            | ExchangeError::Schema(_)
            | ExchangeError::UnknownMarket { .. }
            | ExchangeError::UnknownExchange(_)
            | ExchangeError::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let transport = ExchangeError::status(502, "https://example.com");
        assert_eq!(transport.kind(), ErrorKind::Transport);
        assert!(transport.is_transient());
        assert!(!transport.is_bug());

        let rate = ExchangeError::RateLimit("binance".to_string());
        assert_eq!(rate.kind(), ErrorKind::RateLimit);
        assert!(rate.is_transient());
        assert_eq!(rate.suggested_retry_delay(), Some(Duration::from_secs(60)));

        let unknown = ExchangeError::UnknownMarket {
            exchange: "bittrex".to_string(),
            pair: MarketPair::from_strs("BTC", "ZZZ"),
        };
        assert!(unknown.is_skippable());
        assert!(!unknown.is_transient());
        assert_eq!(unknown.suggested_retry_delay(), None);

        let schema = ExchangeError::schema("no asks");
        assert!(schema.is_bug());
        assert_eq!(schema.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_display() {
        let unknown = ExchangeError::UnknownMarket {
            exchange: "bittrex".to_string(),
            pair: MarketPair::from_strs("BTC", "ZZZ"),
        };
        assert_eq!(unknown.to_string(), "Unknown market ZZZ/BTC on bittrex");

        let transport = ExchangeError::status(500, "https://api.example.com/x");
        assert!(transport.to_string().contains("500"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: ExchangeError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
