//! ecoNET-300 Connectors: Device Access and Polling
//!
//! ## Overview
//!
//! This crate turns a PLUM ecoNET-300 controller on the local network into
//! a set of entities a home-automation host can display and control. It
//! covers everything that touches the network or the polling timeline;
//! static tables and the cache live in `econet-core`.
//!
//! ## Layers
//!
//! ```text
//! ┌────────────────────┐
//! │     entities       │  sensor / binary sensor / number
//! ├────────────────────┤
//! │  DataCoordinator   │  30 s polling loop, last good snapshot
//! ├────────────────────┤
//! │     EconetApi      │  identity, merged snapshot, limits, writes
//! ├────────────────────┤
//! │   EconetClient     │  basic auth, status mapping, timeout retry
//! ├────────────────────┤
//! │     Transport      │  ureq on tokio's blocking pool
//! └────────────────────┘
//! ```
//!
//! ## Failure Model
//!
//! - Rejected credentials (`401`) surface as [`EconetError::Auth`] and stop
//!   polling.
//! - Missing data fails one poll; entities keep showing the last snapshot.
//! - Unknown parameters and refused writes are logged and reported as
//!   `None` / `false`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use econet_connectors::{setup_entry, EconetConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EconetConfig::new("192.168.1.50", "admin", "admin");
//! let integration = setup_entry(&config).await?;
//!
//! for sensor in &integration.sensors {
//!     println!("{} = {:?}", sensor.name(), sensor.native_value());
//! }
//!
//! let (_stop, shutdown) = tokio::sync::watch::channel(false);
//! integration.coordinator.run(shutdown).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod gateway;
pub mod http;
pub mod integration;

pub use config::EconetConfig;
pub use coordinator::{DataCoordinator, UpdateError};
pub use entity::{BinarySensorEntity, BoundEntity, DeviceInfo, NumberEntity, SensorEntity};
pub use gateway::EconetApi;
pub use http::{EconetClient, HttpConfig, Transport, TransportError};
#[cfg(feature = "http")]
pub use http::UreqTransport;
pub use integration::{setup_entry_with_transport, validate_connection, Integration, SetupError, ValidationFailure};
#[cfg(feature = "http")]
pub use integration::setup_entry;

pub use econet_core::{EconetError, EconetResult};
