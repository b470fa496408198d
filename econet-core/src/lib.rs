//! Core types for the ecoNET-300 boiler controller client
//!
//! Everything here is synchronous and network-free:
//! - [`cache`]: TTL key/value cache used by the parameter gateway
//! - [`time`]: clock abstraction driving cache expiry
//! - [`params`]: snapshots, limits and the name -> index mapping table
//! - [`descriptions`]: static entity tables and value rendering
//! - [`constants`]: endpoint names and device-info strings
//!
//! ```no_run
//! use econet_core::params::map_param;
//! use econet_core::descriptions::SENSOR_TYPES;
//!
//! assert_eq!(map_param("tempCOSet"), Some("1280"));
//! let names: Vec<_> = SENSOR_TYPES.iter().map(|d| d.name).collect();
//! ```

#![deny(unsafe_code)]

pub mod cache;
pub mod constants;
pub mod descriptions;
pub mod errors;
pub mod params;
pub mod time;

// Public API
pub use cache::MemCache;
pub use errors::{EconetError, EconetResult};
pub use params::{map_param, DeviceIdentity, Limits, ParameterSnapshot};
pub use time::{MockTimeSource, SystemTime, TimeSource, Timestamp};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
