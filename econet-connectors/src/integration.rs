//! Per-entry wiring
//!
//! Builds the whole object graph for one configuration entry and hands it
//! back as a plain value. Nothing is registered globally; the host keeps the
//! returned [`Integration`] for as long as the entry is loaded.
//!
//! ```text
//! EconetConfig ─▶ EconetClient ─▶ EconetApi ─▶ DataCoordinator ─▶ entities
//!                                   ▲
//!                              MemCache
//! ```

use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;
use thiserror::Error;

use econet_core::cache::MemCache;
use econet_core::EconetError;

use crate::config::EconetConfig;
use crate::coordinator::{DataCoordinator, UpdateError};
use crate::entity::{
    create_binary_sensors, create_controller_sensors, create_mixer_sensors, create_numbers,
    BinarySensorEntity, NumberEntity, SensorEntity,
};
use crate::gateway::EconetApi;
use crate::http::{EconetClient, Transport};

/// Why an entry could not be loaded
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetupError {
    /// Credentials rejected; the host should start re-authentication
    #[error("Client not authenticated")]
    AuthFailed,

    /// Controller unreachable or returned no data; the host may retry later
    #[error("Target not ready: {0}")]
    NotReady(String),
}

impl From<EconetError> for SetupError {
    fn from(err: EconetError) -> Self {
        match err {
            EconetError::Auth => SetupError::AuthFailed,
            other => SetupError::NotReady(other.to_string()),
        }
    }
}

impl From<UpdateError> for SetupError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::AuthFailed => SetupError::AuthFailed,
            UpdateError::UpdateFailed(reason) => SetupError::NotReady(reason),
        }
    }
}

/// Outcome of a connection check run by a config UI
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("invalid_auth")]
    InvalidAuth,

    #[error("cannot_connect")]
    CannotConnect,
}

/// Everything loaded for one configuration entry
pub struct Integration {
    pub api: Arc<EconetApi>,
    pub coordinator: Arc<DataCoordinator>,
    pub sensors: Vec<SensorEntity>,
    pub binary_sensors: Vec<BinarySensorEntity>,
    pub numbers: Vec<NumberEntity>,
}

impl Integration {
    pub fn entity_count(&self) -> usize {
        self.sensors.len() + self.binary_sensors.len() + self.numbers.len()
    }
}

impl std::fmt::Debug for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("api", &self.api)
            .field("coordinator", &self.coordinator)
            .field("sensors", &self.sensors.len())
            .field("binary_sensors", &self.binary_sensors.len())
            .field("numbers", &self.numbers.len())
            .finish()
    }
}

fn make_client(config: &EconetConfig, transport: Arc<dyn Transport>) -> EconetClient {
    EconetClient::new(config.http_config(), transport)
}

/// Check that the controller answers with these credentials; returns its uid
pub async fn validate_connection(
    config: &EconetConfig,
    transport: Arc<dyn Transport>,
) -> Result<String, ValidationFailure> {
    if let Err(e) = config.validate() {
        warn!("Invalid configuration: {}", e);
        return Err(ValidationFailure::CannotConnect);
    }

    let api = EconetApi::new(make_client(config, transport), MemCache::new());
    match api.initialize().await {
        Ok(()) => Ok(api.uid()),
        Err(EconetError::Auth) => Err(ValidationFailure::InvalidAuth),
        Err(e) => {
            warn!("Cannot connect to {}: {}", api.host(), e);
            Err(ValidationFailure::CannotConnect)
        }
    }
}

/// Load one entry over the given transport
pub async fn setup_entry_with_transport(
    config: &EconetConfig,
    transport: Arc<dyn Transport>,
) -> Result<Integration, SetupError> {
    config.validate()?;

    let cache: MemCache<Value> = MemCache::new();
    let api = Arc::new(EconetApi::create(make_client(config, transport), cache).await?);

    let coordinator = Arc::new(DataCoordinator::with_interval(api.clone(), config.poll_interval()));
    coordinator.first_refresh().await?;

    let mut sensors = create_controller_sensors(&coordinator);
    sensors.extend(create_mixer_sensors(&coordinator));
    let binary_sensors = create_binary_sensors(&coordinator);
    let numbers = create_numbers(&coordinator).await?;

    let integration = Integration {
        api,
        coordinator,
        sensors,
        binary_sensors,
        numbers,
    };
    info!(
        "Loaded {} entities for controller {}",
        integration.entity_count(),
        integration.api.uid()
    );
    Ok(integration)
}

/// Load one entry over HTTP
#[cfg(feature = "http")]
pub async fn setup_entry(config: &EconetConfig) -> Result<Integration, SetupError> {
    setup_entry_with_transport(config, Arc::new(crate::http::UreqTransport::new())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_mapping() {
        assert_eq!(SetupError::from(EconetError::Auth), SetupError::AuthFailed);
        assert_eq!(
            SetupError::from(UpdateError::UpdateFailed("x".into())),
            SetupError::NotReady("x".into())
        );
        assert!(matches!(
            SetupError::from(EconetError::Config("host".into())),
            SetupError::NotReady(_)
        ));
    }

    #[test]
    fn validation_failure_codes() {
        assert_eq!(ValidationFailure::InvalidAuth.to_string(), "invalid_auth");
        assert_eq!(ValidationFailure::CannotConnect.to_string(), "cannot_connect");
    }
}
