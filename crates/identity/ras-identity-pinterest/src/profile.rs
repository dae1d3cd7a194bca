//! Profile lookup against the Pinterest `me` endpoint.

use crate::error::{ErrorRecord, codes};
use crate::provider::PinterestStrategy;
use crate::transport::HttpResponse;
use crate::types::ProviderProfile;
use serde_json::{Value, json};
use tracing::{debug, error};

/// Fields requested from the profile endpoint.
pub const PROFILE_FIELDS: &str = "id,first_name,last_name,url,username,bio,created_at,counts,image";

const USERINFO_ERROR_MESSAGE: &str = "Failed when attempting to query for user information";

impl PinterestStrategy {
    /// Fetch the profile of the user owning `access_token`.
    ///
    /// Any failure is returned as a finished `userinfo_error` record.
    pub async fn userinfo(&self, access_token: &str) -> Result<ProviderProfile, ErrorRecord> {
        let params = [("access_token", access_token), ("fields", PROFILE_FIELDS)];

        let response = self
            .transport
            .get_query(&self.config.userinfo_endpoint, &params)
            .await
            .map_err(|e| {
                error!("Profile request failed: {}", e);
                userinfo_error(&HttpResponse::default()).with_reason(e.to_string())
            })?;

        match parse_profile(&response.body) {
            Some(profile) => {
                debug!("Retrieved Pinterest profile for uid {}", profile.id());
                Ok(profile)
            }
            None => {
                error!(
                    "Unusable profile response (status {}, {} bytes)",
                    response.status,
                    response.body.len()
                );
                Err(userinfo_error(&response))
            }
        }
    }
}

/// The `data` object of a non-empty JSON body.
fn parse_profile(body: &str) -> Option<ProviderProfile> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(mut root) => match root.remove("data")? {
            Value::Object(data) => Some(ProviderProfile::new(data)),
            _ => None,
        },
        _ => None,
    }
}

fn userinfo_error(response: &HttpResponse) -> ErrorRecord {
    ErrorRecord::new(
        codes::USERINFO_ERROR,
        USERINFO_ERROR_MESSAGE,
        json!({
            "response": response.body,
            "headers": response.headers_json(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_variants() {
        assert!(parse_profile("").is_none());
        assert!(parse_profile("  \n").is_none());
        assert!(parse_profile("<html>oops</html>").is_none());
        assert!(parse_profile(r#"{"message": "Authorization failed."}"#).is_none());
        assert!(parse_profile(r#"{"data": null}"#).is_none());

        let profile = parse_profile(r#"{"data": {"id": "1", "username": "ann"}}"#).unwrap();
        assert_eq!(profile.id(), "1");
        assert_eq!(profile.username(), "ann");
    }

    #[test]
    fn test_userinfo_error_carries_response_and_headers() {
        let mut response = HttpResponse {
            status: 401,
            body: String::new(),
            ..Default::default()
        };
        response
            .headers
            .insert("x-ratelimit-remaining".to_string(), "0".to_string());

        let record = userinfo_error(&response);
        assert_eq!(record.code, "userinfo_error");
        assert_eq!(record.provider, "Pinterest");
        assert_eq!(record.raw["response"], "");
        assert_eq!(record.raw["headers"]["x-ratelimit-remaining"], "0");
    }
}
