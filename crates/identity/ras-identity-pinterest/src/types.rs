//! Protocol and result types for the Pinterest flow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Query parameters sent to the authorization endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRequestParams {
    pub response_type: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub state: String,
    pub scope: Option<String>,
}

impl AuthorizationRequestParams {
    /// Ordered key/value pairs; `scope` is left out when absent or empty.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("response_type", self.response_type.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("state", self.state.as_str()),
        ];
        if let Some(scope) = self.scope.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("scope", scope));
        }
        pairs
    }
}

/// Where the host should send the browser to start a login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRedirect {
    pub url: String,
    pub state: String,
}

/// Query parameters Pinterest sends back to the callback endpoint.
///
/// Every field is optional; the full inbound map is kept in `raw` so provider
/// errors can be reported with their original context. Deserializes from the
/// flat query map, e.g. through axum's `Query`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>")]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_reason: Option<String>,
    pub error_description: Option<String>,
    #[serde(skip)]
    pub raw: HashMap<String, String>,
}

impl CallbackParams {
    /// Build from the complete inbound query map.
    pub fn from_query(query: HashMap<String, String>) -> Self {
        Self {
            code: query.get("code").cloned(),
            state: query.get("state").cloned(),
            error: query.get("error").cloned(),
            error_reason: query.get("error_reason").cloned(),
            error_description: query.get("error_description").cloned(),
            raw: query,
        }
    }

    /// The authorization code, if present and non-blank.
    pub fn code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    pub fn raw_json(&self) -> Value {
        serde_json::to_value(&self.raw).unwrap_or(Value::Null)
    }
}

impl From<HashMap<String, String>> for CallbackParams {
    fn from(query: HashMap<String, String>) -> Self {
        Self::from_query(query)
    }
}

/// Parsed body of the token endpoint response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenExchangeResult {
    pub access_token: Option<String>,
}

impl TokenExchangeResult {
    pub fn from_value(value: &Value) -> Self {
        Self {
            access_token: value
                .get("access_token")
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        }
    }
}

/// Read-only view over the `data` object of the profile response.
///
/// Absent or non-string fields read as the empty string, so callers never
/// branch on the shape of the provider payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    data: Map<String, Value>,
}

impl ProviderProfile {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// String form of a top-level field. Numbers are rendered, everything else is empty.
    pub fn get(&self, key: &str) -> String {
        match self.data.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn id(&self) -> String {
        self.get("id")
    }

    pub fn first_name(&self) -> String {
        self.get("first_name")
    }

    pub fn last_name(&self) -> String {
        self.get("last_name")
    }

    pub fn username(&self) -> String {
        self.get("username")
    }

    pub fn bio(&self) -> String {
        self.get("bio")
    }

    pub fn url(&self) -> String {
        self.get("url")
    }

    pub fn website(&self) -> String {
        self.get("website")
    }

    /// URL of the image stored under `size` (e.g. `"60x60"`).
    pub fn image_url(&self, size: &str) -> String {
        self.data
            .get("image")
            .and_then(|images| images.get(size))
            .and_then(|image| image.get("url"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn raw(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Normalized identity handed to the host on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAuthResult {
    pub provider: String,
    pub uid: String,
    pub info: AuthInfo,
    pub credentials: Credentials,
    pub raw: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub name: String,
    pub nickname: String,
    pub image: String,
    pub bio: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<AuthUrls>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUrls {
    pub website: String,
}

/// Pinterest tokens carry no expiry or refresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
}
