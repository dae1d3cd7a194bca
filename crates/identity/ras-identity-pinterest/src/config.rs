//! Pinterest strategy configuration.

use crate::error::{StrategyError, StrategyResult};
use crate::state::state_expiry;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const AUTHORIZATION_ENDPOINT: &str = "https://api.pinterest.com/oauth/";
pub const TOKEN_ENDPOINT: &str = "https://api.pinterest.com/v1/oauth/token";
pub const USERINFO_ENDPOINT: &str = "https://api.pinterest.com/v1/me/";

/// Permissions requested when no scope is configured.
pub const DEFAULT_SCOPE: &str =
    "read_public,write_public,read_relationships,write_relationships";

/// Path segment appended to the strategy address to form the default redirect URI.
pub const CALLBACK_PATH: &str = "int_callback";

/// Configuration for a single Pinterest strategy instance.
///
/// Built once at startup and shared read-only between every login attempt.
#[derive(Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Comma-joined permission list. Empty means no `scope` parameter is sent.
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_userinfo_endpoint")]
    pub userinfo_endpoint: String,
    #[serde(default = "default_state_ttl")]
    pub state_ttl_seconds: u64,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_authorization_endpoint() -> String {
    AUTHORIZATION_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    TOKEN_ENDPOINT.to_string()
}

fn default_userinfo_endpoint() -> String {
    USERINFO_ENDPOINT.to_string()
}

fn default_state_ttl() -> u64 {
    600 // 10 minutes
}

fn default_http_timeout() -> u64 {
    30
}

/// Builds the default callback address from the strategy's own public URL.
pub fn default_redirect_uri(strategy_url: &str) -> String {
    if strategy_url.ends_with('/') {
        format!("{}{}", strategy_url, CALLBACK_PATH)
    } else {
        format!("{}/{}", strategy_url, CALLBACK_PATH)
    }
}

impl StrategyConfig {
    /// Create a configuration with every optional key at its default.
    ///
    /// `strategy_url` is the public address the strategy is mounted at, e.g.
    /// `https://example.com/auth/pinterest/`.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        strategy_url: &str,
    ) -> StrategyResult<Self> {
        let config = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: default_redirect_uri(strategy_url),
            scope: default_scope(),
            authorization_endpoint: default_authorization_endpoint(),
            token_endpoint: default_token_endpoint(),
            userinfo_endpoint: default_userinfo_endpoint(),
            state_ttl_seconds: default_state_ttl(),
            http_timeout_seconds: default_http_timeout(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the flat key/value form used by host frameworks.
    ///
    /// `client_id` and `client_secret` are required; `redirect_uri` and `scope`
    /// fall back to their defaults when absent.
    pub fn from_map(map: &HashMap<String, String>, strategy_url: &str) -> StrategyResult<Self> {
        let required = |key: &'static str| {
            map.get(key)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or(StrategyError::MissingConfig(key))
        };

        let mut config = Self::new(required("client_id")?, required("client_secret")?, strategy_url)?;

        if let Some(redirect_uri) = map.get("redirect_uri").filter(|v| !v.is_empty()) {
            config.redirect_uri = redirect_uri.clone();
        }
        if let Some(scope) = map.get("scope") {
            config.scope = scope.clone();
        }

        Ok(config)
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Point all three provider endpoints at another base URL.
    pub fn with_endpoints(
        mut self,
        authorization_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        userinfo_endpoint: impl Into<String>,
    ) -> Self {
        self.authorization_endpoint = authorization_endpoint.into();
        self.token_endpoint = token_endpoint.into();
        self.userinfo_endpoint = userinfo_endpoint.into();
        self
    }

    pub fn with_state_ttl(mut self, seconds: u64) -> Self {
        self.state_ttl_seconds = seconds;
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    /// Check the required keys. Deserialized configs should call this before use.
    pub fn validate(&self) -> StrategyResult<()> {
        if self.client_id.is_empty() {
            return Err(StrategyError::MissingConfig("client_id"));
        }
        if self.client_secret.is_empty() {
            return Err(StrategyError::MissingConfig("client_secret"));
        }
        if self.redirect_uri.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "redirect_uri must not be empty".to_string(),
            ));
        }
        if state_expiry(Utc::now(), self.state_ttl_seconds).is_none() {
            return Err(StrategyError::InvalidConfig(format!(
                "state_ttl_seconds {} is out of range",
                self.state_ttl_seconds
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("userinfo_endpoint", &self.userinfo_endpoint)
            .field("state_ttl_seconds", &self.state_ttl_seconds)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}
