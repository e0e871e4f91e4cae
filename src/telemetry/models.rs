//! Telemetry API payload model
//!
//! Only the outer shape of the document is typed. Thermostat records and the
//! structure graph stay as raw JSON until extraction so one malformed device
//! or location cannot sink the whole snapshot.

use crate::error::{PollerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decoded response body of the telemetry API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryPayload {
    #[serde(default)]
    pub devices: Option<Devices>,

    /// `structures[structure_id].wheres[where_id].name`, walked on lookup
    #[serde(default)]
    pub structures: Value,
}

/// `devices` section. Thermostats are keyed by device id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Devices {
    #[serde(default)]
    pub thermostats: Option<BTreeMap<String, Value>>,
}

impl TelemetryPayload {
    /// Decode the structural part of a payload
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            PollerError::unexpected_shape(format!("Payload does not match the device graph: {e}"))
        })
    }

    /// Resolve the display name of a location
    ///
    /// Any missing or mistyped step along the way yields `None`.
    pub fn room_name(&self, structure_id: &str, where_id: &str) -> Option<&str> {
        self.structures
            .get(structure_id)?
            .get("wheres")?
            .get(where_id)?
            .get("name")?
            .as_str()
    }
}

/// HVAC operating mode as configured by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    HeatCool,
    Eco,
    #[serde(other)]
    Unknown,
}

impl HvacMode {
    pub const ALL: [HvacMode; 5] = [
        HvacMode::Off,
        HvacMode::Heat,
        HvacMode::Cool,
        HvacMode::HeatCool,
        HvacMode::Eco,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Off => "off",
            HvacMode::Heat => "heat",
            HvacMode::Cool => "cool",
            HvacMode::HeatCool => "heat-cool",
            HvacMode::Eco => "eco",
            HvacMode::Unknown => "unknown",
        }
    }
}

/// What the HVAC system is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacState {
    Off,
    Heating,
    Cooling,
    #[serde(other)]
    Unknown,
}

impl HvacState {
    pub const ALL: [HvacState; 3] = [HvacState::Off, HvacState::Heating, HvacState::Cooling];

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacState::Off => "off",
            HvacState::Heating => "heating",
            HvacState::Cooling => "cooling",
            HvacState::Unknown => "unknown",
        }
    }
}

/// One thermostat as reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: String,
    #[serde(default)]
    pub name: String,
    pub ambient_temperature_f: f64,
    pub target_temperature_f: f64,
    pub target_temperature_high_f: f64,
    pub target_temperature_low_f: f64,
    pub humidity: i64,
    pub hvac_mode: HvacMode,
    pub hvac_state: HvacState,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub has_fan: bool,
    #[serde(default)]
    pub has_leaf: bool,
    pub structure_id: String,
    pub where_id: String,
}
