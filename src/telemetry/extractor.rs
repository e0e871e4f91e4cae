//! Flattens a telemetry payload into per-device measurements

use crate::error::{PollerError, Result};
use crate::telemetry::measurement::Measurement;
use crate::telemetry::models::{DeviceRecord, TelemetryPayload};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// Walk `payload` and yield three measurements per locatable thermostat
///
/// Thermostats are visited in ascending device id order. A device whose
/// record does not decode, or whose structure/where does not resolve, is
/// skipped with a warning.
pub fn extract(payload: &TelemetryPayload) -> Result<impl Iterator<Item = Measurement> + '_> {
    let thermostats = payload
        .devices
        .as_ref()
        .and_then(|d| d.thermostats.as_ref())
        .ok_or_else(|| PollerError::unexpected_shape("payload has no devices.thermostats"))?;

    if thermostats.is_empty() {
        info!("No thermostats in telemetry payload");
    }

    Ok(thermostats
        .iter()
        .filter_map(move |(id, raw)| locate(payload, id, raw))
        .flat_map(|(device, room)| Measurement::for_device(&device, room)))
}

fn locate<'a>(
    payload: &'a TelemetryPayload,
    id: &str,
    raw: &Value,
) -> Option<(DeviceRecord, &'a str)> {
    let device = match DeviceRecord::deserialize(raw) {
        Ok(device) => device,
        Err(e) => {
            warn!(device_id = %id, error = %e, "Skipping undecodable thermostat record");
            return None;
        }
    };

    match payload.room_name(&device.structure_id, &device.where_id) {
        Some(room) => Some((device, room)),
        None => {
            warn!(
                device_id = %device.device_id,
                structure_id = %device.structure_id,
                where_id = %device.where_id,
                "Skipping thermostat with unresolvable location"
            );
            None
        }
    }
}
