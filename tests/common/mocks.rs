//! In-process fetcher and sink doubles

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use thermostat_telemetry::client::{Endpoint, FetchResult, TelemetryFetcher};
use thermostat_telemetry::storage::MetricsSink;
use thermostat_telemetry::telemetry::Measurement;
use thermostat_telemetry::{PollerError, Result};

/// Fetcher that replays a fixed script of results
///
/// Once the script runs out the last entry repeats. Every call records the
/// endpoint it was asked to hit.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<FetchResult>>,
    last: Mutex<Option<FetchResult>>,
    calls: Mutex<Vec<Endpoint>>,
    delay: Duration,
}

impl ScriptedFetcher {
    pub fn new(script: impl IntoIterator<Item = FetchResult>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Sleep this long before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `redirects` redirect answers followed by `then`
    pub fn redirects_then(redirects: usize, target: Endpoint, then: FetchResult) -> Self {
        let mut script: Vec<_> = (0..redirects)
            .map(|_| FetchResult::Redirect(target.clone()))
            .collect();
        script.push(then);
        Self::new(script)
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TelemetryFetcher for ScriptedFetcher {
    async fn fetch(&self, endpoint: &Endpoint, _bearer_token: &str) -> Result<FetchResult> {
        self.calls.lock().unwrap().push(endpoint.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(result) => {
                *last = Some(result.clone());
                Ok(result)
            }
            None => last
                .clone()
                .ok_or_else(|| PollerError::transport("fetch script is empty")),
        }
    }
}

/// Sink that keeps every write in memory
///
/// Writes of the measurement named in `fail_on` are rejected.
#[derive(Default)]
pub struct RecordingSink {
    written: Mutex<Vec<(Measurement, DateTime<Utc>)>>,
    fail_on: Option<&'static str>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(measurement_name: &'static str) -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            fail_on: Some(measurement_name),
        }
    }

    pub fn written(&self) -> Vec<(Measurement, DateTime<Utc>)> {
        self.written.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.written.lock().unwrap().len()
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn write(&self, measurement: &Measurement, timestamp: DateTime<Utc>) -> Result<()> {
        if self.fail_on == Some(measurement.name()) {
            return Err(PollerError::sink_write(format!(
                "rejected {}",
                measurement.name()
            )));
        }

        self.written
            .lock()
            .unwrap()
            .push((measurement.clone(), timestamp));
        Ok(())
    }
}
