use anyhow::{Context, Result};
use ras_identity_pinterest::StrategyConfig;

/// Configuration for the Pinterest login host
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pinterest_client_id: String,
    pub pinterest_client_secret: String,
    /// Public address of the strategy routes, used to derive the default redirect URI.
    pub public_url: String,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            pinterest_client_id: std::env::var("PINTEREST_CLIENT_ID")
                .context("PINTEREST_CLIENT_ID environment variable is required")?,
            pinterest_client_secret: std::env::var("PINTEREST_CLIENT_SECRET")
                .context("PINTEREST_CLIENT_SECRET environment variable is required")?,
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            redirect_uri: std::env::var("PINTEREST_REDIRECT_URI").ok(),
            scope: std::env::var("PINTEREST_SCOPE").ok(),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }

    pub fn strategy_url(&self) -> String {
        format!("{}/auth/pinterest/", self.public_url.trim_end_matches('/'))
    }

    pub fn strategy_config(&self) -> Result<StrategyConfig> {
        let mut config = StrategyConfig::new(
            self.pinterest_client_id.clone(),
            self.pinterest_client_secret.clone(),
            &self.strategy_url(),
        )
        .context("Invalid Pinterest strategy configuration")?;

        if let Some(redirect_uri) = &self.redirect_uri {
            config = config.with_redirect_uri(redirect_uri.clone());
        }
        if let Some(scope) = &self.scope {
            config = config.with_scope(scope.clone());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_config() -> AppConfig {
        AppConfig {
            pinterest_client_id: "id".to_string(),
            pinterest_client_secret: "secret".to_string(),
            public_url: "https://login.example.com/".to_string(),
            redirect_uri: None,
            scope: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
        }
    }

    #[test]
    fn test_default_redirect_uri_follows_public_url() {
        let config = app_config().strategy_config().unwrap();
        assert_eq!(
            config.redirect_uri,
            "https://login.example.com/auth/pinterest/int_callback"
        );
    }

    #[test]
    fn test_overrides_are_applied() {
        let mut app = app_config();
        app.redirect_uri = Some("https://other.example.com/cb".to_string());
        app.scope = Some(String::new());

        let config = app.strategy_config().unwrap();
        assert_eq!(config.redirect_uri, "https://other.example.com/cb");
        assert_eq!(config.scope, "");
    }
}
