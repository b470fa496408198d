//! Binary sensor descriptions
//!
//! Each actuator has two registers: `availability_key` says whether the
//! actuator is fitted at all, `key` says whether it is running right now.

use super::{DeviceClass, Describe};

#[derive(Debug, Clone, PartialEq)]
pub struct BinarySensorDescription {
    pub key: &'static str,
    pub availability_key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub icon_off: Option<&'static str>,
    pub device_class: DeviceClass,
}

impl BinarySensorDescription {
    /// Icon for the given state, falling back to `icon` when no off-icon exists
    pub fn icon_for(&self, is_on: bool) -> &'static str {
        match self.icon_off {
            Some(off) if !is_on => off,
            _ => self.icon,
        }
    }
}

impl Describe for BinarySensorDescription {
    fn key(&self) -> &str {
        self.key
    }

    fn name(&self) -> &str {
        self.name
    }
}

const fn running(
    availability_key: &'static str,
    key: &'static str,
    name: &'static str,
    icon: &'static str,
    icon_off: &'static str,
) -> BinarySensorDescription {
    BinarySensorDescription {
        key,
        availability_key,
        name,
        icon,
        icon_off: Some(icon_off),
        device_class: DeviceClass::Running,
    }
}

pub const BINARY_SENSOR_TYPES: &[BinarySensorDescription] = &[
    running("pumpCWU", "pumpCWUWorks", "Water pump", "mdi:pump", "mdi:pump-off"),
    running("pumpCirculation", "pumpCirculationWorks", "Circulation pump", "mdi:pump", "mdi:pump-off"),
    running("pumpFireplace", "pumpFireplaceWorks", "Fireplace pump", "mdi:pump", "mdi:pump-off"),
    running("pumpSolar", "pumpSolarWorks", "Solar pump", "mdi:pump", "mdi:pump-off"),
    running("pumpCO", "pumpCOWorks", "Pump", "mdi:pump", "mdi:pump-off"),
    running("lighter", "lighterWorks", "Lighter", "mdi:fire", "mdi:fire-off"),
    running("feeder", "feederWorks", "Feeder", "mdi:screw-lag", "mdi:screw-lag"),
    running("fan", "fanWorks", "Fan", "mdi:fan", "mdi:fan-off"),
    running("fan2Exhaust", "fan2ExhaustWorks", "Fan2", "mdi:fan", "mdi:fan-off"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_switches_with_state() {
        let fan = BINARY_SENSOR_TYPES.iter().find(|d| d.key == "fanWorks").unwrap();
        assert_eq!(fan.icon_for(true), "mdi:fan");
        assert_eq!(fan.icon_for(false), "mdi:fan-off");
    }

    #[test]
    fn icon_without_off_variant() {
        let desc = BinarySensorDescription {
            icon_off: None,
            ..BINARY_SENSOR_TYPES[0].clone()
        };
        assert_eq!(desc.icon_for(false), "mdi:pump");
    }

    #[test]
    fn works_keys_derive_from_availability_keys() {
        for desc in BINARY_SENSOR_TYPES {
            assert_eq!(desc.key, format!("{}Works", desc.availability_key));
        }
    }
}
