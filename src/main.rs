//! Thermostat telemetry poller - main entry point

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thermostat_telemetry::{
    client::create_resolver, logging::init_logging, storage::InfluxSink, Poller, PollerConfig,
};
use tracing::{error, info};

/// Poll a cloud thermostat API and store its telemetry in InfluxDB
#[derive(Parser, Debug)]
#[command(name = "thermostat-telemetry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "THERMOSTAT_LOG_JSON")]
    json_logs: bool,

    /// Run a single polling cycle and exit
    #[arg(long)]
    once: bool,

    /// Override the polling interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // The subscriber may not be installed yet
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = PollerConfig::from_env().context("Failed to load configuration")?;
    config.logging.json_format |= cli.json_logs;
    if let Some(ms) = cli.interval_ms {
        config.schedule.interval = Duration::from_millis(ms);
    }

    init_logging(&config.logging, cli.debug)?;
    config.validate().context("Invalid configuration")?;

    info!(
        host = %config.api.default_host,
        port = config.api.default_port,
        interval_ms = config.schedule.interval.as_millis() as u64,
        "Starting thermostat telemetry poller"
    );

    let resolver = create_resolver(&config.api)?;
    let sink = InfluxSink::connect(&config.influx)
        .await
        .context("Metrics sink is not usable")?;

    let poller = Poller::new(
        resolver,
        Arc::new(sink),
        config.api.token.clone(),
        config.schedule.interval,
    );

    if cli.once {
        return Ok(match poller.run_cycle().await {
            Ok(report) => {
                info!(
                    devices = report.devices,
                    written = report.written,
                    failed = report.failed,
                    "Single cycle finished"
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(category = e.category(), error = %e, "Single cycle failed");
                ExitCode::FAILURE
            }
        });
    }

    poller.run(shutdown_signal()).await;
    info!("Shut down cleanly");
    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
