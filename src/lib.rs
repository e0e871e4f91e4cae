//! Thermostat telemetry poller
//!
//! Polls a cloud thermostat API on a fixed interval, follows its 307
//! endpoint redirects, flattens the device graph into temperature, humidity
//! and device-state measurements, and writes them to InfluxDB.
//!
//! # Pipeline
//!
//! - [`client`]: endpoint cache, single-request fetcher, resolution loop
//! - [`telemetry`]: payload model, extractor, normalized measurements
//! - [`storage`]: metrics sink trait and the InfluxDB backend
//! - [`scheduler`]: the interval loop tying it together

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod storage;
pub mod telemetry;

pub use config::PollerConfig;
pub use error::{PollerError, Result};
pub use scheduler::{CycleReport, Poller};
