//! Number (set-point) descriptions
//!
//! `min_value`/`max_value` are fallbacks only. Bound number entities replace
//! them with the limits reported by the device.

use super::{DeviceClass, Describe, Unit};
use crate::params::Limits;

#[derive(Debug, Clone, PartialEq)]
pub struct NumberDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub device_class: DeviceClass,
    pub unit: Unit,
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
}

impl NumberDescription {
    pub fn default_limits(&self) -> Limits {
        Limits::new(self.min_value, self.max_value)
    }
}

impl Describe for NumberDescription {
    fn key(&self) -> &str {
        self.key
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub const NUMBER_TYPES: &[NumberDescription] = &[
    NumberDescription {
        key: "tempCOSet",
        name: "Boiler set temperature",
        icon: "mdi:thermometer",
        device_class: DeviceClass::Temperature,
        unit: Unit::Celsius,
        min_value: 27.0,
        max_value: 68.0,
        step: 1.0,
    },
    NumberDescription {
        key: "tempCWUSet",
        name: "HUW set temperature",
        icon: "mdi:thermometer",
        device_class: DeviceClass::Temperature,
        unit: Unit::Celsius,
        min_value: 20.0,
        max_value: 55.0,
        step: 1.0,
    },
];
