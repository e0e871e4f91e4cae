//! Common test utilities
//!
//! Each integration test binary pulls in the whole module, so not every
//! helper is used everywhere.
#![allow(dead_code, unused_imports)]

pub mod mocks;
pub mod test_fixtures;
pub mod thermostat_mock;

pub use mocks::{RecordingSink, ScriptedFetcher};
pub use thermostat_mock::MockThermostatApi;
