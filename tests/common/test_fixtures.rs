//! Test fixtures for consistent payloads and configuration

use rstest::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thermostat_telemetry::client::{Endpoint, EndpointCache, EndpointResolver, TelemetryFetcher};

pub const DEFAULT_HOST: &str = "developer-api.nest.com";
pub const DEFAULT_PORT: u16 = 443;

/// Known device ids in [`sample_payload`]
pub struct TestDevices;

impl TestDevices {
    pub const HALLWAY: &'static str = "peyiJNo0IldT2YlIVtYaGQ";
    pub const BEDROOM: &'static str = "VG2nAVMeBU4ftCo0O0OqNg";
}

pub fn default_endpoint() -> Endpoint {
    Endpoint::new(DEFAULT_HOST, DEFAULT_PORT)
}

pub fn alt_endpoint() -> Endpoint {
    Endpoint::new("alt-host", 444)
}

/// Resolver over `fetcher` with the production default endpoint
pub fn resolver_for(fetcher: Arc<dyn TelemetryFetcher>, max_redirects: u32) -> EndpointResolver {
    EndpointResolver::new(fetcher, EndpointCache::new(default_endpoint()), max_redirects)
}

pub fn thermostat(
    device_id: &str,
    where_id: &str,
    hvac_mode: &str,
    hvac_state: &str,
) -> Value {
    json!({
        "device_id": device_id,
        "name": "Thermostat",
        "ambient_temperature_f": 68.0,
        "target_temperature_f": 70.0,
        "target_temperature_high_f": 75.0,
        "target_temperature_low_f": 64.0,
        "humidity": 45,
        "hvac_mode": hvac_mode,
        "hvac_state": hvac_state,
        "is_online": true,
        "has_fan": true,
        "has_leaf": false,
        "structure_id": "VqFabWH21nwVyd4RWgJgNb292wa7hG_dUwo2i2SG7j3-BOLY0BA4sw",
        "where_id": where_id,
        "software_version": "5.6.1",
        "temperature_scale": "F"
    })
}

/// Two thermostats in one structure, shaped like a real API snapshot
#[fixture]
pub fn sample_payload() -> Value {
    json!({
        "devices": {
            "thermostats": {
                "peyiJNo0IldT2YlIVtYaGQ": thermostat(TestDevices::HALLWAY, "where-hallway", "heat", "heating"),
                "VG2nAVMeBU4ftCo0O0OqNg": thermostat(TestDevices::BEDROOM, "where-bedroom", "cool", "off")
            }
        },
        "structures": {
            "VqFabWH21nwVyd4RWgJgNb292wa7hG_dUwo2i2SG7j3-BOLY0BA4sw": {
                "name": "Home",
                "away": "home",
                "wheres": {
                    "where-hallway": { "where_id": "where-hallway", "name": "Hallway" },
                    "where-bedroom": { "where_id": "where-bedroom", "name": "Bedroom" }
                }
            }
        },
        "metadata": { "access_token": "c.redacted", "client_version": 1 }
    })
}

#[fixture]
pub fn empty_thermostats_payload() -> Value {
    json!({
        "devices": { "thermostats": {} },
        "structures": {}
    })
}

pub const FAST_INTERVAL: Duration = Duration::from_millis(25);
