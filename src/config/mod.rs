//! Configuration management for the thermostat telemetry poller
//!
//! Configuration is read once at startup from environment variables,
//! validated, and then handed by value to the scheduler, fetcher and sink.

use crate::error::{PollerError, Result};
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr, time::Duration};
use url::Url;

/// Default telemetry API host used whenever no redirect target is cached
pub const DEFAULT_API_HOST: &str = "developer-api.nest.com";

/// Default telemetry API port
pub const DEFAULT_API_PORT: u16 = 443;

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(60_000);

/// Default ceiling for redirect/reset/retry hops in one resolution
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Top-level poller configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PollerConfig {
    /// Telemetry API configuration
    pub api: ApiConfig,

    /// Metrics sink configuration
    pub influx: InfluxConfig,

    /// Scheduler configuration
    pub schedule: ScheduleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Telemetry API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token sent with every request
    #[serde(skip_serializing)]
    pub token: String,

    /// Host used when the endpoint cache is empty
    pub default_host: String,

    /// Port used when the endpoint cache is empty
    pub default_port: u16,

    /// URL scheme for requests. Always https in production.
    pub scheme: String,

    /// Maximum redirect/reset/retry hops per resolution
    pub max_redirects: u32,

    /// Optional per-request timeout. None leaves it to the transport.
    #[serde(with = "humantime_serde", default)]
    pub request_timeout: Option<Duration>,

    /// Pause before re-requesting after a 429
    #[serde(with = "humantime_serde")]
    pub rate_limit_delay: Duration,
}

/// InfluxDB sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluxConfig {
    /// InfluxDB URL (e.g., http://localhost:8086)
    pub url: String,

    /// Organization name
    pub org: String,

    /// API token for authentication
    #[serde(skip_serializing)]
    pub token: String,

    /// Bucket the measurements are written to. Must already exist.
    pub bucket: String,
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Time between polling cycles
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (trace, debug, info, warn, error or a full EnvFilter directive)
    pub level: String,

    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_host: DEFAULT_API_HOST.to_string(),
            default_port: DEFAULT_API_PORT,
            scheme: "https".to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            request_timeout: None,
            rate_limit_delay: Duration::ZERO,
        }
    }
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            org: "thermostat".to_string(),
            token: String::new(),
            bucket: "thermostat".to_string(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Read and parse an optional environment variable
fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PollerError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl PollerConfig {
    /// Load configuration from environment variables
    ///
    /// Missing required values are not an error here; call [`validate`]
    /// afterwards so the caller decides when to fail.
    ///
    /// [`validate`]: PollerConfig::validate
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(token) = env::var("THERMOSTAT_API_TOKEN") {
            config.api.token = token;
        }

        if let Ok(host) = env::var("THERMOSTAT_API_HOST") {
            config.api.default_host = host;
        }

        if let Some(port) = env_parse("THERMOSTAT_API_PORT")? {
            config.api.default_port = port;
        }

        if let Some(max) = env_parse("THERMOSTAT_MAX_REDIRECTS")? {
            config.api.max_redirects = max;
        }

        if let Some(secs) = env_parse::<u64>("THERMOSTAT_REQUEST_TIMEOUT_SECS")? {
            config.api.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(ms) = env_parse::<u64>("THERMOSTAT_RATE_LIMIT_DELAY_MS")? {
            config.api.rate_limit_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = env_parse::<u64>("THERMOSTAT_POLL_INTERVAL_MS")? {
            config.schedule.interval = Duration::from_millis(ms);
        }

        if let Ok(url) = env::var("INFLUXDB_URL") {
            config.influx.url = url;
        }

        if let Ok(org) = env::var("INFLUXDB_ORG") {
            config.influx.org = org;
        }

        if let Ok(token) = env::var("INFLUXDB_TOKEN") {
            config.influx.token = token;
        }

        if let Ok(bucket) = env::var("INFLUXDB_BUCKET") {
            config.influx.bucket = bucket;
        }

        if let Ok(level) = env::var("RUST_LOG") {
            config.logging.level = level;
        }

        config.logging.json_format = env_flag("THERMOSTAT_LOG_JSON");

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.token.trim().is_empty() {
            return Err(PollerError::config(
                "THERMOSTAT_API_TOKEN is required but was not set",
            ));
        }

        if self.api.default_host.trim().is_empty() {
            return Err(PollerError::config("API host cannot be empty"));
        }

        if self.api.default_port == 0 {
            return Err(PollerError::config("API port must be greater than zero"));
        }

        if self.schedule.interval.is_zero() {
            return Err(PollerError::config(
                "Polling interval must be greater than zero",
            ));
        }

        if self.influx.url.trim().is_empty() {
            return Err(PollerError::config(
                "INFLUXDB_URL is required but was not set",
            ));
        }

        let sink_url = Url::parse(&self.influx.url)
            .map_err(|e| PollerError::config(format!("Invalid INFLUXDB_URL: {e}")))?;
        if sink_url.scheme() != "http" && sink_url.scheme() != "https" {
            return Err(PollerError::config(
                "INFLUXDB_URL must use http or https scheme",
            ));
        }

        if self.influx.bucket.trim().is_empty() {
            return Err(PollerError::config("INFLUXDB_BUCKET cannot be empty"));
        }

        Ok(())
    }
}
