//! Fixed-interval polling scheduler
//!
//! Every tick spawns an independent cycle: resolve and fetch, extract,
//! write. Cycles may overlap when the API is slow. A failed cycle is logged
//! and forgotten; the next tick fires regardless.

use crate::client::EndpointResolver;
use crate::error::Result;
use crate::storage::MetricsSink;
use crate::telemetry::{extract, TelemetryPayload};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Outcome of one successful polling cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Thermostats that produced measurements
    pub devices: usize,
    /// Measurements written
    pub written: usize,
    /// Measurements the sink rejected
    pub failed: usize,
}

/// Runs the poll, extract, write pipeline
#[derive(Clone)]
pub struct Poller {
    resolver: EndpointResolver,
    sink: Arc<dyn MetricsSink>,
    token: Arc<str>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        resolver: EndpointResolver,
        sink: Arc<dyn MetricsSink>,
        token: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            resolver,
            sink,
            token: Arc::from(token.into()),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single cycle
    ///
    /// Resolution and extraction errors abort the cycle. Sink errors are
    /// counted per measurement and never abort the remaining writes.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let raw = self.resolver.resolve_and_fetch(&self.token).await?;
        let timestamp = Utc::now();
        let payload = TelemetryPayload::from_value(raw)?;

        let mut report = CycleReport::default();
        let mut devices = HashSet::new();

        for measurement in extract(&payload)? {
            devices.insert(measurement.device_id().to_string());

            match self.sink.write(&measurement, timestamp).await {
                Ok(()) => report.written += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        measurement = measurement.name(),
                        device_id = measurement.device_id(),
                        error = %e,
                        "Failed to write measurement"
                    );
                }
            }
        }

        report.devices = devices.len();
        Ok(report)
    }

    /// Run one cycle and log its outcome
    async fn run_logged_cycle(&self) -> Option<CycleReport> {
        match self.run_cycle().await {
            Ok(report) => {
                info!(
                    devices = report.devices,
                    written = report.written,
                    failed = report.failed,
                    "Polling cycle finished"
                );
                Some(report)
            }
            Err(e) => {
                error!(
                    category = e.category(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Polling cycle failed"
                );
                None
            }
        }
    }

    /// Fire cycles every `interval` until `shutdown` resolves
    ///
    /// The first cycle starts immediately. On shutdown no new cycles are
    /// started and the in-flight ones are awaited.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        let mut in_flight = JoinSet::new();
        tokio::pin!(shutdown);

        info!(interval_ms = self.interval.as_millis() as u64, "Poller started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(in_flight = in_flight.len(), "Shutdown requested, no new cycles");
                    break;
                }
                _ = ticker.tick() => {
                    let poller = self.clone();
                    in_flight.spawn(async move { poller.run_logged_cycle().await });
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Polling cycle task aborted");
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Polling cycle task aborted");
            }
        }

        debug!("Poller stopped");
    }
}

