//! Normalized measurements written to the metrics sink
//!
//! Each thermostat produces one reading of each kind per cycle. Field and
//! tag names here are the sink schema; dashboards query them verbatim.

use crate::telemetry::models::{DeviceRecord, HvacMode, HvacState};
use serde::Serialize;

pub const TEMPERATURE_MEASUREMENT: &str = "sensor.temperature.reading";
pub const HUMIDITY_MEASUREMENT: &str = "sensor.humidity.reading";
pub const DEVICE_STATE_MEASUREMENT: &str = "device.state.reading";

/// Value of `device_type` on device-state points
pub const THERMOSTAT_DEVICE_TYPE: &str = "thermostat";

/// Field value in sink terms
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// Booleans are stored as 0/1 integers
    pub fn flag(value: bool) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureReading {
    pub device_id: String,
    pub room: String,
    pub ambient: f64,
    pub target: f64,
    pub target_high: f64,
    pub target_low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidityReading {
    pub device_id: String,
    pub room: String,
    pub humidity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStateReading {
    pub device_id: String,
    pub room: String,
    pub device_type: String,
    pub fan: bool,
    pub leaf: bool,
    pub online: bool,
    pub mode: HvacMode,
    pub state: HvacState,
}

/// One point destined for the metrics sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measurement {
    Temperature(TemperatureReading),
    Humidity(HumidityReading),
    DeviceState(DeviceStateReading),
}

impl Measurement {
    /// Build the three readings for one device located in `room`
    pub fn for_device(device: &DeviceRecord, room: &str) -> [Measurement; 3] {
        [
            Measurement::Temperature(TemperatureReading {
                device_id: device.device_id.clone(),
                room: room.to_string(),
                ambient: device.ambient_temperature_f,
                target: device.target_temperature_f,
                target_high: device.target_temperature_high_f,
                target_low: device.target_temperature_low_f,
            }),
            Measurement::Humidity(HumidityReading {
                device_id: device.device_id.clone(),
                room: room.to_string(),
                humidity: device.humidity,
            }),
            Measurement::DeviceState(DeviceStateReading {
                device_id: device.device_id.clone(),
                room: room.to_string(),
                device_type: THERMOSTAT_DEVICE_TYPE.to_string(),
                fan: device.has_fan,
                leaf: device.has_leaf,
                online: device.is_online,
                mode: device.hvac_mode,
                state: device.hvac_state,
            }),
        ]
    }

    /// Measurement (series) name
    pub fn name(&self) -> &'static str {
        match self {
            Measurement::Temperature(_) => TEMPERATURE_MEASUREMENT,
            Measurement::Humidity(_) => HUMIDITY_MEASUREMENT,
            Measurement::DeviceState(_) => DEVICE_STATE_MEASUREMENT,
        }
    }

    pub fn device_id(&self) -> &str {
        match self {
            Measurement::Temperature(r) => &r.device_id,
            Measurement::Humidity(r) => &r.device_id,
            Measurement::DeviceState(r) => &r.device_id,
        }
    }

    pub fn room(&self) -> &str {
        match self {
            Measurement::Temperature(r) => &r.room,
            Measurement::Humidity(r) => &r.room,
            Measurement::DeviceState(r) => &r.room,
        }
    }

    /// Tags in write order
    pub fn tags(&self) -> Vec<(&'static str, &str)> {
        let mut tags = vec![("device_id", self.device_id()), ("room", self.room())];
        if let Measurement::DeviceState(r) = self {
            tags.push(("device_type", r.device_type.as_str()));
        }
        tags
    }

    /// Fields in write order
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        match self {
            Measurement::Temperature(r) => vec![
                ("ambient", FieldValue::Float(r.ambient)),
                ("target", FieldValue::Float(r.target)),
                ("target_high", FieldValue::Float(r.target_high)),
                ("target_low", FieldValue::Float(r.target_low)),
            ],
            Measurement::Humidity(r) => vec![("humidity", FieldValue::Integer(r.humidity))],
            Measurement::DeviceState(r) => {
                let mut fields = vec![
                    ("fan", FieldValue::flag(r.fan)),
                    ("leaf", FieldValue::flag(r.leaf)),
                    ("online", FieldValue::flag(r.online)),
                    ("mode", FieldValue::Text(r.mode.as_str().to_string())),
                    ("state", FieldValue::Text(r.state.as_str().to_string())),
                ];
                fields.extend(
                    HvacMode::ALL
                        .iter()
                        .map(|m| (mode_field(*m), FieldValue::flag(r.mode == *m))),
                );
                fields.extend(
                    HvacState::ALL
                        .iter()
                        .map(|s| (state_field(*s), FieldValue::flag(r.state == *s))),
                );
                fields
            }
        }
    }

    /// Look up a single field by name
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

fn mode_field(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Off => "mode_off",
        HvacMode::Heat => "mode_heat",
        HvacMode::Cool => "mode_cool",
        HvacMode::HeatCool => "mode_heat_cool",
        HvacMode::Eco => "mode_eco",
        HvacMode::Unknown => "mode_unknown",
    }
}

fn state_field(state: HvacState) -> &'static str {
    match state {
        HvacState::Off => "state_off",
        HvacState::Heating => "state_heating",
        HvacState::Cooling => "state_cooling",
        HvacState::Unknown => "state_unknown",
    }
}
