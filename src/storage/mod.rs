//! Metrics sink abstraction
//!
//! The scheduler only sees [`MetricsSink`]; the InfluxDB backend lives in
//! [`influx`].

pub mod influx;

pub use influx::InfluxSink;

use crate::error::Result;
use crate::telemetry::Measurement;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable destination for normalized measurements
///
/// Writes are independent: a failed write must not affect any other.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Write one measurement stamped with `timestamp`
    async fn write(&self, measurement: &Measurement, timestamp: DateTime<Utc>) -> Result<()>;
}
