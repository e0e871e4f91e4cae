//! Telemetry payload model and its normalization into sink measurements

pub mod extractor;
pub mod measurement;
pub mod models;

pub use extractor::extract;
pub use measurement::{FieldValue, Measurement};
pub use models::{DeviceRecord, HvacMode, HvacState, TelemetryPayload};
