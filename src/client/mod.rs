//! Telemetry API client: endpoint cache, single-request fetcher and the
//! resolution loop tying them together.

pub mod endpoint;
pub mod fetcher;
pub mod resolver;

pub use endpoint::{Endpoint, EndpointCache};
pub use fetcher::{is_empty_payload, FetchResult, HttpFetcher, TelemetryFetcher};
pub use resolver::EndpointResolver;

use crate::config::ApiConfig;
use crate::error::Result;
use std::sync::Arc;

/// Build the production resolver from configuration
pub fn create_resolver(config: &ApiConfig) -> Result<EndpointResolver> {
    let fetcher = HttpFetcher::new(config)?;
    let cache = EndpointCache::new(Endpoint::new(
        config.default_host.clone(),
        config.default_port,
    ));

    Ok(
        EndpointResolver::new(Arc::new(fetcher), cache, config.max_redirects)
            .with_rate_limit_delay(config.rate_limit_delay),
    )
}
