//! Error Types for ecoNET-300 Device Access
//!
//! ## Error Categories
//!
//! Failures fall into three tiers, each with a different blast radius:
//!
//! ### Session failures
//! - `Auth`: the controller rejected the basic-auth credentials (HTTP 401).
//!   Never retried. The polling owner must stop and ask for new credentials.
//!
//! ### Poll failures
//! - `Data`: an endpoint returned nothing, or the payload lacks the expected
//!   sub-key (`curr`, `data`). Only the current poll cycle fails; the last
//!   good snapshot stays in place.
//!
//! ### Soft failures
//! Unknown parameter names, missing limits and rejected writes are not
//! errors at all. They surface as `Ok(None)` / `Ok(false)` plus a log line.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use econet_core::EconetError;
//!
//! fn on_poll_result(result: Result<(), EconetError>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(EconetError::Auth) => {
//!             // stop polling, trigger re-authentication
//!         }
//!         Err(EconetError::Data(_)) => {
//!             // keep last snapshot, try again next interval
//!         }
//!         Err(EconetError::Config(_)) => {
//!             // fix configuration
//!         }
//!     }
//! }
//! ```

use thiserror::Error;

/// Result type for device operations
pub type EconetResult<T> = Result<T, EconetError>;

/// Errors raised by the device client and the parameter gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconetError {
    /// Credentials rejected by the device
    #[error("Authentication failed")]
    Auth,

    /// Expected response shape missing
    #[error("Data error: {0}")]
    Data(String),

    /// Invalid configuration entry
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EconetError {
    /// Whether this error invalidates the whole session rather than one call
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth | Self::Config(_))
    }
}
