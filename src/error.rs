//! Error types for the thermostat telemetry poller
//!
//! Every failure the poller can hit maps onto one of six variants. Only
//! configuration errors are fatal; everything else is scoped to a single
//! polling cycle (or a single sink write) and is logged by the scheduler.

use thiserror::Error;

/// Result type alias for poller operations
pub type Result<T> = std::result::Result<T, PollerError>;

/// Error taxonomy for the polling pipeline
#[derive(Error, Debug)]
pub enum PollerError {
    /// Missing or invalid startup configuration, or an unusable sink
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or connection failure talking to the telemetry API
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API returned a body or header that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The redirect/reset chain did not settle within the allowed attempts
    #[error("Too many redirects: {attempts} attempts exceeded the limit of {max}")]
    TooManyRedirects { attempts: u32, max: u32 },

    /// The payload decoded but does not have the expected device graph
    #[error("Unexpected payload shape: {0}")]
    UnexpectedPayloadShape(String),

    /// A single measurement could not be written to the metrics sink
    #[error("Sink write failed: {0}")]
    SinkWrite(String),
}

impl PollerError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an unexpected payload shape error
    pub fn unexpected_shape<S: Into<String>>(msg: S) -> Self {
        Self::UnexpectedPayloadShape(msg.into())
    }

    /// Create a sink write error
    pub fn sink_write<S: Into<String>>(msg: S) -> Self {
        Self::SinkWrite(msg.into())
    }

    /// Whether the next polling cycle has a reasonable chance of succeeding
    /// without operator intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::TooManyRedirects { .. })
    }

    /// Whether the error should terminate the process. Only startup
    /// configuration problems qualify.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Short machine-friendly label, used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::TooManyRedirects { .. } => "too_many_redirects",
            Self::UnexpectedPayloadShape(_) => "unexpected_payload_shape",
            Self::SinkWrite(_) => "sink_write",
        }
    }
}

impl From<serde_json::Error> for PollerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
