//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::error::{PollerError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter. `--debug` wins over the configured level.
pub fn build_filter(config: &LoggingConfig, debug: bool) -> Result<EnvFilter> {
    let directive = if debug { "debug" } else { config.level.as_str() };

    EnvFilter::try_new(directive)
        .map_err(|e| PollerError::config(format!("Invalid log filter '{directive}': {e}")))
}

/// Install the global subscriber: compact text, or JSON when enabled
pub fn init_logging(config: &LoggingConfig, debug: bool) -> Result<()> {
    let filter = build_filter(config, debug)?;

    let result = if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };

    result.map_err(|e| PollerError::config(format!("Failed to install log subscriber: {e}")))
}
