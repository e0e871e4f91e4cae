//! InfluxDB 2.x metrics sink

use crate::config::InfluxConfig;
use crate::error::{PollerError, Result};
use crate::storage::MetricsSink;
use crate::telemetry::{FieldValue, Measurement};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream;
use influxdb2::api::write::TimestampPrecision;
use influxdb2::models::DataPoint;
use influxdb2::Client;
use tracing::{debug, info};

/// Writes each measurement as one InfluxDB point
#[derive(Clone)]
pub struct InfluxSink {
    client: Client,
    bucket: String,
}

impl std::fmt::Debug for InfluxSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxSink")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl InfluxSink {
    /// Connect and verify that the configured bucket exists
    ///
    /// Both an unreachable server and a missing bucket are configuration
    /// errors: the poller refuses to start rather than drop every write.
    pub async fn connect(config: &InfluxConfig) -> Result<Self> {
        let client = Client::new(&config.url, &config.org, &config.token);

        let buckets = client.list_buckets(None).await.map_err(|e| {
            PollerError::config(format!("InfluxDB at {} is not usable: {e}", config.url))
        })?;

        if !buckets.buckets.iter().any(|b| b.name == config.bucket) {
            return Err(PollerError::config(format!(
                "InfluxDB bucket '{}' does not exist in org '{}'",
                config.bucket, config.org
            )));
        }

        info!(url = %config.url, bucket = %config.bucket, "InfluxDB sink ready");

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Build the InfluxDB point for a measurement, millisecond timestamp
pub fn to_data_point(measurement: &Measurement, timestamp: DateTime<Utc>) -> Result<DataPoint> {
    let mut builder = DataPoint::builder(measurement.name());

    for (key, value) in measurement.tags() {
        builder = builder.tag(key, value);
    }

    for (key, value) in measurement.fields() {
        builder = match value {
            FieldValue::Float(v) => builder.field(key, v),
            FieldValue::Integer(v) => builder.field(key, v),
            FieldValue::Text(v) => builder.field(key, v),
        };
    }

    builder
        .timestamp(timestamp.timestamp_millis())
        .build()
        .map_err(|e| PollerError::sink_write(format!("Failed to build data point: {e}")))
}

#[async_trait]
impl MetricsSink for InfluxSink {
    async fn write(&self, measurement: &Measurement, timestamp: DateTime<Utc>) -> Result<()> {
        let point = to_data_point(measurement, timestamp)?;

        self.client
            .write_with_precision(
                &self.bucket,
                stream::iter(vec![point]),
                TimestampPrecision::Milliseconds,
            )
            .await
            .map_err(|e| {
                PollerError::sink_write(format!(
                    "{} for {}: {e}",
                    measurement.name(),
                    measurement.device_id()
                ))
            })?;

        debug!(
            measurement = measurement.name(),
            device_id = measurement.device_id(),
            "Point written"
        );
        Ok(())
    }
}
