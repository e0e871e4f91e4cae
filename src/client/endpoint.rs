//! Effective endpoint of the telemetry API
//!
//! The API hands out 307 redirects to the host that actually serves the
//! account. The redirect target is remembered here for the life of the
//! process and thrown away again when the API answers 404.

use crate::error::{PollerError, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// A host/port pair the fetcher can talk to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a redirect `Location` header value such as
    /// `https://firebase-apiserver.example:9553/some/path`.
    ///
    /// The scheme and any path, query or fragment are discarded. When the
    /// port is omitted the scheme's default port is used.
    pub fn from_location(location: &str) -> Result<Self> {
        let url = Url::parse(location.trim()).map_err(|e| {
            PollerError::decode(format!("Invalid redirect location '{location}': {e}"))
        })?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                PollerError::decode(format!("Redirect location '{location}' has no host"))
            })?;

        let port = url.port_or_known_default().ok_or_else(|| {
            PollerError::decode(format!("Redirect location '{location}' has no port"))
        })?;

        Ok(Self::new(host, port))
    }

    /// Root URL of this endpoint for the given scheme
    pub fn base_url(&self, scheme: &str) -> String {
        format!("{scheme}://{}:{}/", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Process-wide cache of the effective API endpoint
///
/// Holds either a remembered redirect target or nothing, in which case the
/// configured default is handed out. Cloning shares the same state, so
/// overlapping polling cycles see each other's updates.
#[derive(Debug, Clone)]
pub struct EndpointCache {
    default: Endpoint,
    cached: Arc<RwLock<Option<Endpoint>>>,
}

impl EndpointCache {
    /// Create an empty cache falling back to `default`
    pub fn new(default: Endpoint) -> Self {
        Self {
            default,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Current endpoint: the cached redirect target, or the default
    pub async fn get(&self) -> Endpoint {
        self.cached
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.default.clone())
    }

    /// Remember a redirect target, replacing host and port together
    pub async fn set(&self, endpoint: Endpoint) {
        *self.cached.write().await = Some(endpoint);
    }

    /// Forget the redirect target so the default is used again
    pub async fn clear(&self) {
        *self.cached.write().await = None;
    }

    /// The cached redirect target, if any
    pub async fn cached(&self) -> Option<Endpoint> {
        self.cached.read().await.clone()
    }

    pub fn default_endpoint(&self) -> &Endpoint {
        &self.default
    }
}
