//! Sensor descriptions
//!
//! Controller sensors attach to the controller device; mixer sensors attach
//! to a per-mixer device routed through the controller.

use super::{DeviceClass, Describe, EntityCategory, StateClass, Unit, ValueFormat};
use crate::params::display_precision;

/// Read-only parameter shown as a sensor
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: Option<&'static str>,
    pub unit: Option<Unit>,
    pub state_class: Option<StateClass>,
    pub device_class: Option<DeviceClass>,
    pub entity_category: Option<EntityCategory>,
    pub format: ValueFormat,
}

impl SensorDescription {
    /// Base for the tables below
    pub const DEFAULT: SensorDescription = SensorDescription {
        key: "",
        name: "",
        icon: None,
        unit: None,
        state_class: None,
        device_class: None,
        entity_category: None,
        format: ValueFormat::Identity,
    };

    /// Suggested decimals, when the controller panel defines them
    pub fn display_precision(&self) -> Option<u8> {
        display_precision(self.key)
    }
}

impl Describe for SensorDescription {
    fn key(&self) -> &str {
        self.key
    }

    fn name(&self) -> &str {
        self.name
    }
}

const fn temperature(key: &'static str, name: &'static str, icon: &'static str) -> SensorDescription {
    SensorDescription {
        key,
        name,
        icon: Some(icon),
        unit: Some(Unit::Celsius),
        state_class: Some(StateClass::Measurement),
        device_class: Some(DeviceClass::Temperature),
        format: ValueFormat::Round(2),
        ..SensorDescription::DEFAULT
    }
}

const fn diagnostic(key: &'static str, name: &'static str) -> SensorDescription {
    SensorDescription {
        key,
        name,
        entity_category: Some(EntityCategory::Diagnostic),
        ..SensorDescription::DEFAULT
    }
}

pub const SENSOR_TYPES: &[SensorDescription] = &[
    SensorDescription {
        key: "fanPower",
        name: "Fan power",
        icon: Some("mdi:fan"),
        unit: Some(Unit::Percentage),
        state_class: Some(StateClass::Measurement),
        device_class: Some(DeviceClass::PowerFactor),
        format: ValueFormat::Round(2),
        ..SensorDescription::DEFAULT
    },
    temperature("tempCO", "Boiler actual temp.", "mdi:thermometer-lines"),
    temperature("tempCOSet", "Boiler set temp.", "mdi:thermometer-chevron-up"),
    temperature("tempFeeder", "Feeder temp.", "mdi:thermometer"),
    temperature("tempFlueGas", "Exhaust temperature", "mdi:thermometer"),
    temperature("tempBack", "Water back temperature", "mdi:thermometer"),
    temperature("tempCWU", "Water temperature", "mdi:thermometer"),
    temperature("tempExternalSensor", "Outside temperature", "mdi:thermometer"),
    SensorDescription {
        key: "boilerPower",
        name: "Boiler output",
        icon: Some("mdi:gauge"),
        unit: Some(Unit::Percentage),
        state_class: Some(StateClass::Measurement),
        device_class: Some(DeviceClass::PowerFactor),
        format: ValueFormat::Round(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "fuelLevel",
        name: "Fuel level",
        icon: Some("mdi:gas-station"),
        unit: Some(Unit::Percentage),
        state_class: Some(StateClass::Measurement),
        format: ValueFormat::Round(1),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "mode",
        name: "Operation mode",
        icon: Some("mdi:sync"),
        format: ValueFormat::OperationMode,
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "lambdaSet",
        name: "Oxygen set level",
        icon: Some("mdi:lambda"),
        unit: Some(Unit::Percentage),
        state_class: Some(StateClass::Measurement),
        format: ValueFormat::DivideByTen,
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "lambdaLevel",
        name: "Oxygen level",
        icon: Some("mdi:lambda"),
        unit: Some(Unit::Percentage),
        state_class: Some(StateClass::Measurement),
        format: ValueFormat::DivideByTen,
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "thermostat",
        name: "Thermostat",
        icon: Some("mdi:thermostat"),
        format: ValueFormat::OnOff,
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "lambdaStatus",
        name: "Lambda status",
        icon: Some("mdi:lambda"),
        format: ValueFormat::LambdaStatus,
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "signal",
        name: "Wi-Fi signal strength",
        unit: Some(Unit::DecibelsMilliwatt),
        state_class: Some(StateClass::Measurement),
        device_class: Some(DeviceClass::SignalStrength),
        entity_category: Some(EntityCategory::Diagnostic),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "quality",
        name: "Wi-Fi signal quality",
        icon: Some("mdi:signal"),
        unit: Some(Unit::Percentage),
        state_class: Some(StateClass::Measurement),
        entity_category: Some(EntityCategory::Diagnostic),
        ..SensorDescription::DEFAULT
    },
    diagnostic("softVer", "Module ecoNET software version"),
    diagnostic("moduleASoftVer", "Module A version"),
    diagnostic("moduleBSoftVer", "Module B version"),
    SensorDescription {
        icon: Some("mdi:raspberry-pi"),
        ..diagnostic("modulePanelSoftVer", "Module Panel version")
    },
    diagnostic("moduleLambdaSoftVer", "Module Lambda version"),
];

/// Sensor belonging to one mixer circuit
#[derive(Debug, Clone, PartialEq)]
pub struct MixerSensorDescription {
    /// Mixer number, starting at 1
    pub mixer: u8,
    pub sensor: SensorDescription,
}

const fn mixer(mixer: u8, key: &'static str, name: &'static str) -> MixerSensorDescription {
    MixerSensorDescription {
        mixer,
        sensor: temperature(key, name, "mdi:thermometer"),
    }
}

pub const MIXER_SENSOR_TYPES: &[MixerSensorDescription] = &[
    mixer(1, "mixerTemp1", "Mixer 1 temperature"),
    mixer(1, "mixerSetTemp1", "Mixer 1 set temperature"),
    mixer(2, "mixerTemp2", "Mixer 2 temperature"),
    mixer(2, "mixerSetTemp2", "Mixer 2 set temperature"),
    mixer(3, "mixerTemp3", "Mixer 3 temperature"),
    mixer(3, "mixerSetTemp3", "Mixer 3 set temperature"),
    mixer(4, "mixerTemp4", "Mixer 4 temperature"),
    mixer(4, "mixerSetTemp4", "Mixer 4 set temperature"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIXER_COUNT;

    #[test]
    fn controller_table_size() {
        assert_eq!(SENSOR_TYPES.len(), 22);
    }

    #[test]
    fn mixers_are_in_range() {
        for desc in MIXER_SENSOR_TYPES {
            assert!((1..=MIXER_COUNT).contains(&desc.mixer));
            assert!(desc.sensor.key.ends_with(&desc.mixer.to_string()));
        }
    }

    #[test]
    fn diagnostic_override_keeps_category() {
        let panel = SENSOR_TYPES
            .iter()
            .find(|d| d.key == "modulePanelSoftVer")
            .unwrap();
        assert_eq!(panel.icon, Some("mdi:raspberry-pi"));
        assert_eq!(panel.entity_category, Some(EntityCategory::Diagnostic));
    }

    #[test]
    fn precision_comes_from_register_table() {
        let co = SENSOR_TYPES.iter().find(|d| d.key == "tempCO").unwrap();
        assert_eq!(co.display_precision(), Some(0));
    }
}
