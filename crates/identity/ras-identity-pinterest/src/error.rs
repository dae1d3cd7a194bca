//! Error types for the Pinterest strategy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PROVIDER_NAME: &str = "Pinterest";

pub type StrategyResult<T> = Result<T, StrategyError>;

/// Failures outside of a login attempt: setup, configuration and state storage.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Missing required configuration key: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("State store error: {0}")]
    StateStore(String),
}

/// Error codes reported in [`ErrorRecord::code`].
pub mod codes {
    /// Used when the provider redirected back without a code and without its own `error`.
    pub const PROVIDER_ERROR: &str = "provider_error";
    pub const STATE_MISMATCH: &str = "state_mismatch";
    pub const ACCESS_TOKEN_ERROR: &str = "access_token_error";
    pub const USERINFO_ERROR: &str = "userinfo_error";
}

/// Terminal failure of a single login attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{provider} authentication failed ({code}): {}", .message.as_deref().unwrap_or("no description"))]
pub struct ErrorRecord {
    pub provider: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Request URL and response body, or the raw callback parameters.
    pub raw: serde_json::Value,
}

impl ErrorRecord {
    pub fn new(code: impl Into<String>, message: impl Into<String>, raw: serde_json::Value) -> Self {
        Self {
            provider: PROVIDER_NAME.to_string(),
            code: code.into(),
            reason: None,
            message: Some(message.into()),
            raw,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_record_serialization_omits_missing_fields() {
        let record = ErrorRecord {
            provider: PROVIDER_NAME.to_string(),
            code: "access_denied".to_string(),
            reason: None,
            message: None,
            raw: serde_json::json!({}),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["provider"], "Pinterest");
        assert_eq!(value["code"], "access_denied");
        assert!(value.get("reason").is_none());
        assert!(value.get("message").is_none());
        assert_eq!(record.to_string(), "Pinterest authentication failed (access_denied): no description");
    }
}
