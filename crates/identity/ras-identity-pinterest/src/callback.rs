//! Callback handling: code exchange, profile lookup, normalization.

use crate::error::{ErrorRecord, PROVIDER_NAME, codes};
use crate::provider::PinterestStrategy;
use crate::types::{
    AuthInfo, AuthUrls, CallbackParams, Credentials, NormalizedAuthResult, ProviderProfile,
    TokenExchangeResult,
};
use serde_json::{Value, json};
use tracing::{error, info, warn};

/// Size key of the avatar used for `info.image`.
pub const AVATAR_SIZE: &str = "60x60";

const ACCESS_TOKEN_ERROR_MESSAGE: &str = "Failed when attempting to obtain access token";
const STATE_MISMATCH_MESSAGE: &str = "Anti-forgery state token was missing, unknown or expired";

impl PinterestStrategy {
    /// Complete a login from the parameters Pinterest redirected back with.
    ///
    /// Exactly one outcome is produced per call; nothing is retried.
    pub async fn callback(&self, params: CallbackParams) -> Result<NormalizedAuthResult, ErrorRecord> {
        let outcome = self.run_callback(&params).await;

        match &outcome {
            Ok(result) => info!("Pinterest login succeeded for uid {}", result.uid),
            Err(record) => warn!("Pinterest login failed: {}", record.code),
        }

        outcome
    }

    async fn run_callback(&self, params: &CallbackParams) -> Result<NormalizedAuthResult, ErrorRecord> {
        let Some(code) = params.code() else {
            return Err(provider_error(params));
        };

        self.check_state(params).await?;

        let access_token = self.exchange_code(code).await?;
        let profile = self.userinfo(&access_token).await?;

        Ok(normalize(profile, access_token))
    }

    async fn check_state(&self, params: &CallbackParams) -> Result<(), ErrorRecord> {
        let mismatch = || {
            ErrorRecord::new(
                codes::STATE_MISMATCH,
                STATE_MISMATCH_MESSAGE,
                params.raw_json(),
            )
        };

        let state = params
            .state
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(mismatch)?;

        match self.state_store.consume(state).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(mismatch()),
            Err(e) => {
                error!("State store lookup failed: {}", e);
                Err(mismatch().with_reason(e.to_string()))
            }
        }
    }

    /// Trade the authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, ErrorRecord> {
        let url = self.config.token_endpoint.as_str();
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code.trim()),
        ];

        let response = match self.transport.post_form(url, &params).await {
            Ok(response) => response,
            Err(e) => {
                error!("Token exchange failed: {}", e);
                return Err(access_token_error(url, Value::Null).with_reason(e.to_string()));
            }
        };

        let parsed: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);

        match TokenExchangeResult::from_value(&parsed).access_token {
            Some(token) => Ok(token),
            None => {
                error!(
                    "Token endpoint returned no access token (status {})",
                    response.status
                );
                Err(access_token_error(url, parsed))
            }
        }
    }
}

fn provider_error(params: &CallbackParams) -> ErrorRecord {
    ErrorRecord {
        provider: PROVIDER_NAME.to_string(),
        code: params
            .error
            .clone()
            .unwrap_or_else(|| codes::PROVIDER_ERROR.to_string()),
        reason: params.error_reason.clone(),
        message: params.error_description.clone(),
        raw: params.raw_json(),
    }
}

fn access_token_error(url: &str, response: Value) -> ErrorRecord {
    ErrorRecord::new(
        codes::ACCESS_TOKEN_ERROR,
        ACCESS_TOKEN_ERROR_MESSAGE,
        json!({
            "url": url,
            "response": response,
        }),
    )
}

/// Map a Pinterest profile onto the provider-agnostic auth result.
pub fn normalize(profile: ProviderProfile, access_token: String) -> NormalizedAuthResult {
    let first_name = profile.first_name();
    let last_name = profile.last_name();
    let name = if last_name.is_empty() {
        first_name
    } else {
        format!("{} {}", first_name, last_name)
    };

    let bio = profile.bio();
    let website = profile.website();

    let info = AuthInfo {
        name,
        nickname: profile.username(),
        image: profile.image_url(AVATAR_SIZE),
        description: Some(bio.clone()).filter(|b| !b.is_empty()),
        bio,
        url: profile.url(),
        urls: (!website.is_empty()).then_some(AuthUrls { website }),
    };

    NormalizedAuthResult {
        provider: PROVIDER_NAME.to_string(),
        uid: profile.id(),
        info,
        credentials: Credentials {
            token: access_token,
        },
        raw: profile.raw(),
    }
}
