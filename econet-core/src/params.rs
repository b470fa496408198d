//! Parameter Model: Snapshots, Limits and the Editable-Parameter Mapping
//!
//! ## Why a mapping table?
//!
//! The controller reports live values by human-readable key (`tempCOSet`),
//! but its limits endpoint and its write endpoint address parameters by an
//! opaque numeric index (`1280`). The table below is the only bridge between
//! the two. It is maintained by hand and is not provided by the device.
//!
//! A parameter missing from the table has no limits and cannot be written.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_HW_VERSION, DEFAULT_SW_REVISION, DEFAULT_UID};

/// Flat map of parameter key to current value, replaced on every poll
pub type ParameterSnapshot = Map<String, Value>;

/// Editable parameter name -> device parameter index
pub const EDITABLE_PARAMS_MAPPING_TABLE: &[(&str, &str)] = &[
    ("tempCOSet", "1280"),
    ("tempCWUSet", "1281"),
];

/// Resolve a parameter name to its device index
pub fn map_param(name: &str) -> Option<&'static str> {
    EDITABLE_PARAMS_MAPPING_TABLE
        .iter()
        .find(|(param, _)| *param == name)
        .map(|(_, idx)| *idx)
}

/// Bounds of an editable parameter as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Controller identity, read once from the system parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub uid: String,
    pub sw_revision: String,
    pub hw_version: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            uid: DEFAULT_UID.to_string(),
            sw_revision: DEFAULT_SW_REVISION.to_string(),
            hw_version: DEFAULT_HW_VERSION.to_string(),
        }
    }
}

/// Boiler operation mode names, indexed by the `mode` register
pub const OPERATION_MODE_NAMES: &[(u64, &str)] = &[
    (0, "TURNED OFF"),
    (1, "FIRE UP"),
    (2, "FIRE UP"),
    (3, "WORK"),
    (4, "SUPERVISION"),
    (5, "Halted"),
    (6, "STOP"),
    (7, "BURNING OFF"),
    (8, "MANUAL"),
    (9, "ALARM"),
    (10, "UNSEALING"),
    (11, "CHIMNEY"),
    (12, "STABILIZATION"),
    (13, "NO TRANSMISSION"),
];

pub fn operation_mode_name(code: u64) -> Option<&'static str> {
    OPERATION_MODE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Display precision the controller panel uses for selected registers
pub const REG_PARAM_PRECISION: &[(&str, u8)] = &[
    ("boilerPowerKW", 1),
    ("boilerPower", 0),
    ("fuelStream", 1),
    ("ecoSterTemp", 1),
    ("ecoSterSetTemp", 1),
    ("tempExternalSensor", 1),
    ("lambdaSet", 1),
    ("lambdaLevel", 1),
    ("thermoTemp", 1),
    ("thermoSetTemp", 0),
    ("tempFeeder", 0),
    ("tempCO", 0),
    ("tempFlueGas", 0),
];

pub fn display_precision(key: &str) -> Option<u8> {
    REG_PARAM_PRECISION
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, p)| *p)
}
