//! Bound Entities
//!
//! An entity is a static description bound to live state: the coordinator
//! for reads, the gateway for identity and writes, and the device it belongs
//! to. Entities never cache values of their own (numbers excepted, see
//! [`NumberEntity`]); every read goes to the coordinator's latest snapshot.
//!
//! ```text
//! ┌───────────────┐   key    ┌──────────────────┐
//! │  Description  │─────────▶│ DataCoordinator  │──▶ snapshot[key]
//! └───────────────┘          └──────────────────┘
//!         │ format                    │
//!         ▼                           ▼
//!   displayed state            EconetApi (uid, writes)
//! ```
//!
//! ## Availability
//!
//! Entities are only created for parameters the controller actually
//! reports. The rules differ per platform:
//! - sensors: key present and not `null`
//! - binary sensors: availability key present and not `false`
//! - numbers: key present and truthy, plus limits resolvable

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use econet_core::constants::{
    DEVICE_INFO_CONTROLLER_NAME, DEVICE_INFO_MANUFACTURER, DEVICE_INFO_MIXER_NAME,
    DEVICE_INFO_MODEL, DOMAIN,
};
use econet_core::descriptions::{
    BinarySensorDescription, Describe, NumberDescription, SensorDescription, BINARY_SENSOR_TYPES,
    MIXER_SENSOR_TYPES, NUMBER_TYPES, SENSOR_TYPES,
};
use econet_core::{EconetResult, Limits};

use crate::coordinator::DataCoordinator;
use crate::gateway::EconetApi;

/// Device registry entry an entity attaches to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: (String, String),
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub configuration_url: String,
    pub sw_version: String,
    pub hw_version: Option<String>,
    pub via_device: Option<(String, String)>,
}

impl DeviceInfo {
    /// The boiler controller itself
    pub fn controller(api: &EconetApi) -> Self {
        let identity = api.identity();
        Self {
            identifiers: (DOMAIN.to_string(), identity.uid),
            name: DEVICE_INFO_CONTROLLER_NAME.to_string(),
            manufacturer: DEVICE_INFO_MANUFACTURER.to_string(),
            model: DEVICE_INFO_MODEL.to_string(),
            configuration_url: api.host().to_string(),
            sw_version: identity.sw_revision,
            hw_version: Some(identity.hw_version),
            via_device: None,
        }
    }

    /// A mixer circuit, reached through the controller
    pub fn mixer(api: &EconetApi, idx: u8) -> Self {
        let identity = api.identity();
        Self {
            identifiers: (DOMAIN.to_string(), format!("{}-mixer-{}", identity.uid, idx)),
            name: format!("{} {}", DEVICE_INFO_MIXER_NAME, idx),
            manufacturer: DEVICE_INFO_MANUFACTURER.to_string(),
            model: DEVICE_INFO_MODEL.to_string(),
            configuration_url: api.host().to_string(),
            sw_version: identity.sw_revision,
            hw_version: None,
            via_device: Some((DOMAIN.to_string(), identity.uid)),
        }
    }
}

/// Which device an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceScope {
    Controller,
    Mixer(u8),
}

/// A description bound to the coordinator and gateway
pub struct BoundEntity<D: 'static> {
    description: &'static D,
    coordinator: Arc<DataCoordinator>,
    scope: DeviceScope,
}

impl<D: Describe + 'static> BoundEntity<D> {
    pub fn new(description: &'static D, coordinator: Arc<DataCoordinator>, scope: DeviceScope) -> Self {
        Self {
            description,
            coordinator,
            scope,
        }
    }

    pub fn description(&self) -> &'static D {
        self.description
    }

    pub fn key(&self) -> &str {
        self.description.key()
    }

    pub fn name(&self) -> &str {
        self.description.name()
    }

    pub fn api(&self) -> &Arc<EconetApi> {
        self.coordinator.api()
    }

    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.api().uid(), self.key())
    }

    pub fn device_info(&self) -> DeviceInfo {
        match self.scope {
            DeviceScope::Controller => DeviceInfo::controller(self.api()),
            DeviceScope::Mixer(idx) => DeviceInfo::mixer(self.api(), idx),
        }
    }

    /// Raw value from the latest snapshot; `None` when absent or null
    pub fn raw_value(&self) -> Option<Value> {
        match self.coordinator.value(self.key()) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }
}

impl<D: 'static> std::fmt::Debug for BoundEntity<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundEntity")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Read-only measurement
pub type SensorEntity = BoundEntity<SensorDescription>;

impl BoundEntity<SensorDescription> {
    /// Rendered state
    pub fn native_value(&self) -> Option<Value> {
        let raw = self.raw_value()?;
        debug!("Update EconetSensor entity: {}", self.name());
        self.description.format.apply(&raw)
    }

    /// Decimals the host should display, when the controller panel defines them
    pub fn suggested_display_precision(&self) -> Option<u8> {
        self.description.display_precision()
    }
}

/// On/off actuator state
pub type BinarySensorEntity = BoundEntity<BinarySensorDescription>;

impl BoundEntity<BinarySensorDescription> {
    pub fn is_on(&self) -> Option<bool> {
        match self.raw_value()? {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_f64().map(|x| x != 0.0),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        self.description.icon_for(self.is_on().unwrap_or(false))
    }
}

/// Writable set-point
///
/// Keeps its own native value so a successful write shows immediately,
/// before the next poll confirms it.
pub struct NumberEntity {
    entity: BoundEntity<NumberDescription>,
    limits: Limits,
    native_value: Mutex<Option<f64>>,
}

impl NumberEntity {
    pub fn new(
        description: &'static NumberDescription,
        coordinator: Arc<DataCoordinator>,
        limits: Limits,
    ) -> Self {
        let entity = BoundEntity::new(description, coordinator, DeviceScope::Controller);
        let native_value = entity.raw_value().and_then(|v| v.as_f64());
        Self {
            entity,
            limits,
            native_value: Mutex::new(native_value),
        }
    }

    pub fn entity(&self) -> &BoundEntity<NumberDescription> {
        &self.entity
    }

    pub fn unique_id(&self) -> String {
        self.entity.unique_id()
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn step(&self) -> f64 {
        self.entity.description().step
    }

    pub fn native_value(&self) -> Option<f64> {
        *self.native_value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pull the latest polled value into the entity
    pub fn sync_state(&self) {
        if let Some(value) = self.entity.raw_value().and_then(|v| v.as_f64()) {
            *self.native_value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        }
    }

    /// Write a new set-point
    ///
    /// Returns `Ok(true)` when the value was written or was already current.
    /// Values below the minimum are rejected without contacting the device;
    /// values above the maximum are only warned about.
    pub async fn set_native_value(&self, value: f64) -> EconetResult<bool> {
        debug!("Set value: {}", value);

        if !value.is_finite() {
            warn!("Requested value: '{}' is not a finite number", value);
            return Ok(false);
        }

        if self.native_value() == Some(value) {
            return Ok(true);
        }

        if value > self.limits.max {
            warn!(
                "Requested value: '{}' exceeds maximum allowed value: '{}'",
                value, self.limits.max
            );
        }

        if value < self.limits.min {
            warn!(
                "Requested value: '{}' is below allowed value: '{}'",
                value, self.limits.min
            );
            return Ok(false);
        }

        // The controller only accepts whole numbers
        let written = value.trunc() as i64;
        if !self.entity.api().set_param(self.entity.key(), written).await? {
            warn!("Setting value failed");
            return Ok(false);
        }

        *self.native_value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        Ok(true)
    }
}

impl std::fmt::Debug for NumberEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberEntity")
            .field("key", &self.entity.key())
            .field("limits", &self.limits)
            .field("native_value", &self.native_value())
            .finish()
    }
}

/// JSON truthiness used for number availability
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn can_add_sensor(desc: &SensorDescription, coordinator: &DataCoordinator) -> bool {
    coordinator.value(desc.key).is_some_and(|v| !v.is_null())
}

pub fn can_add_binary_sensor(desc: &BinarySensorDescription, coordinator: &DataCoordinator) -> bool {
    coordinator
        .value(desc.availability_key)
        .is_some_and(|v| v != Value::Bool(false))
}

pub fn can_add_number(desc: &NumberDescription, coordinator: &DataCoordinator) -> bool {
    coordinator.value(desc.key).is_some_and(|v| is_truthy(&v))
}

pub fn create_controller_sensors(coordinator: &Arc<DataCoordinator>) -> Vec<SensorEntity> {
    let mut entities = Vec::new();

    for description in SENSOR_TYPES {
        if can_add_sensor(description, coordinator) {
            entities.push(BoundEntity::new(description, coordinator.clone(), DeviceScope::Controller));
        } else {
            debug!(
                "Availability key: {} does not exist, entity will not be added",
                description.key
            );
        }
    }

    entities
}

pub fn create_mixer_sensors(coordinator: &Arc<DataCoordinator>) -> Vec<SensorEntity> {
    MIXER_SENSOR_TYPES
        .iter()
        .filter(|desc| can_add_sensor(&desc.sensor, coordinator))
        .map(|desc| BoundEntity::new(&desc.sensor, coordinator.clone(), DeviceScope::Mixer(desc.mixer)))
        .collect()
}

pub fn create_binary_sensors(coordinator: &Arc<DataCoordinator>) -> Vec<BinarySensorEntity> {
    let mut entities = Vec::new();

    for description in BINARY_SENSOR_TYPES {
        if can_add_binary_sensor(description, coordinator) {
            entities.push(BoundEntity::new(description, coordinator.clone(), DeviceScope::Controller));
        } else {
            debug!(
                "Availability key: {} does not exist, entity will not be added",
                description.key
            );
        }
    }

    entities
}

/// Numbers need device limits
///
/// A missing limit skips that entity; an unreadable limits table skips all
/// numbers. Only fatal errors (rejected credentials) propagate.
pub async fn create_numbers(coordinator: &Arc<DataCoordinator>) -> EconetResult<Vec<NumberEntity>> {
    let mut entities = Vec::new();

    for description in NUMBER_TYPES {
        let limits = match coordinator.api().get_param_limits(description.key).await {
            Ok(Some(limits)) => limits,
            Ok(None) => {
                warn!(
                    "Cannot add entity: {}, numeric limits for this entity is None",
                    description.key
                );
                continue;
            }
            Err(e) if !e.is_fatal() => {
                warn!("Cannot add number entities, limits unavailable: {}", e);
                return Ok(entities);
            }
            Err(e) => return Err(e),
        };

        if can_add_number(description, coordinator) {
            entities.push(NumberEntity::new(description, coordinator.clone(), limits));
        } else {
            debug!(
                "Cannot add entity - availability key: {} does not exist",
                description.key
            );
        }
    }

    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(55)));
        assert!(is_truthy(&json!("x")));
    }
}
