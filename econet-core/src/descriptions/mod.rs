//! Entity Descriptions for Controller Parameters
//!
//! Static, data-only tables describing how each device parameter is shown
//! to the host: name, icon, unit, classes and how the raw value is rendered.
//! No behaviour lives here beyond pure lookups; binding a description to
//! live data happens in the connectors crate.
//!
//! ## Module Organization
//!
//! - [`format`] - pure value rendering ([`ValueFormat`])
//! - [`sensor`] - read-only measurements and diagnostics
//! - [`binary_sensor`] - on/off states of pumps, fans, feeder
//! - [`number`] - writable set-points

pub mod binary_sensor;
pub mod format;
pub mod number;
pub mod sensor;

pub use binary_sensor::{BinarySensorDescription, BINARY_SENSOR_TYPES};
pub use format::ValueFormat;
pub use number::{NumberDescription, NUMBER_TYPES};
pub use sensor::{MixerSensorDescription, SensorDescription, MIXER_SENSOR_TYPES, SENSOR_TYPES};

use serde::Serialize;

/// Unit of the native value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "%")]
    Percentage,
    #[serde(rename = "dBm")]
    DecibelsMilliwatt,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Percentage => "%",
            Unit::DecibelsMilliwatt => "dBm",
        }
    }
}

/// What kind of quantity an entity measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    PowerFactor,
    SignalStrength,
    Running,
}

/// How the host should aggregate the value over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

/// Grouping hint for host UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Diagnostic,
    Config,
}

/// Common view over every description table
pub trait Describe {
    /// Parameter key in the snapshot
    fn key(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::map_param;
    use std::collections::HashSet;

    #[test]
    fn entity_keys_are_unique_per_platform() {
        let sensors: HashSet<_> = SENSOR_TYPES
            .iter()
            .map(|d| d.key)
            .chain(MIXER_SENSOR_TYPES.iter().map(|m| m.sensor.key))
            .collect();
        assert_eq!(sensors.len(), SENSOR_TYPES.len() + MIXER_SENSOR_TYPES.len());

        let binary: HashSet<_> = BINARY_SENSOR_TYPES.iter().map(|d| d.key).collect();
        assert_eq!(binary.len(), BINARY_SENSOR_TYPES.len());
    }

    #[test]
    fn every_number_is_writable() {
        for desc in NUMBER_TYPES {
            assert!(map_param(desc.key).is_some(), "{} has no mapping", desc.key);
        }
    }

    #[test]
    fn unit_serializes_to_symbol() {
        assert_eq!(serde_json::to_string(&Unit::Celsius).unwrap(), "\"°C\"");
        assert_eq!(Unit::DecibelsMilliwatt.symbol(), "dBm");
        assert_eq!(
            serde_json::to_string(&DeviceClass::PowerFactor).unwrap(),
            "\"power_factor\""
        );
    }
}
