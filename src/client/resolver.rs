//! Endpoint resolution loop
//!
//! Wraps a [`TelemetryFetcher`] in a bounded loop that follows redirects,
//! falls back to the default endpoint on 404, and re-asks after rate limits
//! or empty answers, until a real payload arrives or the hop budget runs out.

use crate::client::endpoint::EndpointCache;
use crate::client::fetcher::{is_empty_payload, FetchResult, TelemetryFetcher};
use crate::error::{PollerError, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolves the effective API endpoint and fetches one telemetry snapshot
#[derive(Clone)]
pub struct EndpointResolver {
    fetcher: Arc<dyn TelemetryFetcher>,
    cache: EndpointCache,
    max_redirects: u32,
    rate_limit_delay: Duration,
}

impl EndpointResolver {
    pub fn new(fetcher: Arc<dyn TelemetryFetcher>, cache: EndpointCache, max_redirects: u32) -> Self {
        Self {
            fetcher,
            cache,
            max_redirects,
            rate_limit_delay: Duration::ZERO,
        }
    }

    /// Pause this long before re-requesting after a 429
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }

    pub fn max_redirects(&self) -> u32 {
        self.max_redirects
    }

    /// Fetch a non-empty payload, following redirects and resets
    ///
    /// Every redirect, reset, rate limit and empty answer costs one attempt.
    /// Once more than `max_redirects` attempts have been spent the call fails
    /// with [`PollerError::TooManyRedirects`]. Transport failures are returned
    /// immediately.
    pub async fn resolve_and_fetch(&self, bearer_token: &str) -> Result<Value> {
        let mut attempts: u32 = 0;

        loop {
            let endpoint = self.cache.get().await;

            match self.fetcher.fetch(&endpoint, bearer_token).await? {
                FetchResult::Data(payload) if !is_empty_payload(&payload) => {
                    debug!(%endpoint, attempts, "Telemetry payload received");
                    return Ok(payload);
                }
                FetchResult::Data(_) => {
                    debug!(%endpoint, attempt = attempts, "Empty telemetry payload, asking again");
                }
                FetchResult::Redirect(target) => {
                    info!(from = %endpoint, to = %target, attempt = attempts, "Following redirect");
                    self.cache.set(target).await;
                }
                FetchResult::Reset => {
                    warn!(%endpoint, attempt = attempts, "Endpoint not found, resetting to default");
                    self.cache.clear().await;
                }
                FetchResult::RateLimited => {
                    warn!(%endpoint, attempt = attempts, "Rate limited by telemetry API");
                    if !self.rate_limit_delay.is_zero() {
                        tokio::time::sleep(self.rate_limit_delay).await;
                    }
                }
                FetchResult::TransportError(message) => {
                    return Err(PollerError::transport(message));
                }
            }

            attempts += 1;
            if attempts > self.max_redirects {
                return Err(PollerError::TooManyRedirects {
                    attempts,
                    max: self.max_redirects,
                });
            }
        }
    }
}
