//! Single-request HTTP fetcher for the telemetry API
//!
//! One call issues exactly one GET and classifies the answer. The fetcher
//! never follows redirects and never retries; both are the resolver's job.

use crate::client::endpoint::Endpoint;
use crate::config::ApiConfig;
use crate::error::{PollerError, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of one request against the telemetry API
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// 307: the account is served from another host/port
    Redirect(Endpoint),
    /// 404: the cached endpoint is stale, fall back to the default
    Reset,
    /// 429: try again without touching the endpoint cache
    RateLimited,
    /// Anything else. `Value::Null` when the body was empty.
    Data(Value),
    /// The request never produced a response
    TransportError(String),
}

/// Whether a decoded payload carries no telemetry
///
/// An empty body decodes to `null`. Falsy scalars are treated the same way
/// because the API has been seen answering with them instead of a document.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Performs one authenticated GET against a resolved endpoint
#[async_trait]
pub trait TelemetryFetcher: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint, bearer_token: &str) -> Result<FetchResult>;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    scheme: String,
}

impl HttpFetcher {
    /// Build the HTTP client. Automatic redirect following is disabled so
    /// 307 responses reach the classifier.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(format!("thermostat-telemetry/{}", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| PollerError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            scheme: config.scheme.clone(),
        })
    }
}

#[async_trait]
impl TelemetryFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &Endpoint, bearer_token: &str) -> Result<FetchResult> {
        let url = endpoint.base_url(&self.scheme);
        debug!(host = %endpoint.host, port = endpoint.port, "Requesting telemetry");

        let response = match self
            .client
            .get(&url)
            .bearer_auth(bearer_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(FetchResult::TransportError(format!("GET {url} failed: {e}"))),
        };

        let status = response.status();
        match status {
            StatusCode::TEMPORARY_REDIRECT => {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .ok_or_else(|| {
                        PollerError::decode(format!("307 from {endpoint} without Location header"))
                    })?
                    .to_str()
                    .map_err(|e| {
                        PollerError::decode(format!("Unreadable Location header from {endpoint}: {e}"))
                    })?;
                Ok(FetchResult::Redirect(Endpoint::from_location(location)?))
            }
            StatusCode::NOT_FOUND => Ok(FetchResult::Reset),
            StatusCode::TOO_MANY_REQUESTS => Ok(FetchResult::RateLimited),
            _ => {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        return Ok(FetchResult::TransportError(format!(
                            "Reading body from {url} failed: {e}"
                        )))
                    }
                };

                if !status.is_success() {
                    warn!(status = status.as_u16(), %endpoint, "Telemetry API returned non-success status");
                }

                if body.trim().is_empty() {
                    return Ok(FetchResult::Data(Value::Null));
                }

                let payload = serde_json::from_str(&body).map_err(|e| {
                    PollerError::decode(format!("Invalid JSON body from {endpoint}: {e}"))
                })?;
                Ok(FetchResult::Data(payload))
            }
        }
    }
}
