//! Outbound HTTP used by the strategy.

use crate::error::StrategyResult;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[error("HTTP request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

/// Raw response as seen by the strategy: body text and headers, status for logging.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl HttpResponse {
    pub fn headers_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.headers).unwrap_or(serde_json::Value::Null)
    }
}

/// HTTP collaborator. Implementations own timeouts; the strategy never retries.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Form-encoded POST.
    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError>;

    /// GET with `params` appended as the query string.
    async fn get_query(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    pub fn new(http_timeout_seconds: u64) -> StrategyResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(http_timeout_seconds))
            .build()?;

        Ok(Self { http_client })
    }

    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        debug!("{} responded with status {}", url, status);
        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> TransportError {
    TransportError {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .http_client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        Self::read(url, response).await
    }

    async fn get_query(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .http_client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        Self::read(url, response).await
    }
}
