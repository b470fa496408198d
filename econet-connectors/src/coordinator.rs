//! Polling coordinator
//!
//! Owns the single polling timeline: one `fetch_data` per interval, never
//! overlapping. A successful poll replaces the snapshot wholesale; a failed
//! one leaves the previous snapshot in place and flags the update as failed.
//! An authentication failure stops the loop, since retrying with rejected
//! credentials cannot succeed.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use log::{debug, error, warn};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use econet_core::constants::DEFAULT_POLL_INTERVAL_SECS;
use econet_core::{EconetError, ParameterSnapshot};

use crate::gateway::EconetApi;

/// Outcome of a failed poll
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// Credentials rejected; polling cannot continue
    #[error("Authentication failed, re-authentication required")]
    AuthFailed,

    /// This cycle failed; the last good snapshot is retained
    #[error("Error communicating with API: {0}")]
    UpdateFailed(String),
}

impl From<EconetError> for UpdateError {
    fn from(err: EconetError) -> Self {
        match err {
            EconetError::Auth => UpdateError::AuthFailed,
            other => UpdateError::UpdateFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    data: Option<Arc<ParameterSnapshot>>,
    last_update_success: bool,
    generation: u64,
}

/// Periodically refreshes the parameter snapshot shared by all entities
pub struct DataCoordinator {
    api: Arc<EconetApi>,
    update_interval: Duration,
    state: RwLock<CoordinatorState>,
    updates: watch::Sender<u64>,
}

impl DataCoordinator {
    pub fn new(api: Arc<EconetApi>) -> Self {
        Self::with_interval(api, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn with_interval(api: Arc<EconetApi>, update_interval: Duration) -> Self {
        let (updates, _) = watch::channel(0);
        Self {
            api,
            update_interval,
            state: RwLock::new(CoordinatorState::default()),
            updates,
        }
    }

    pub fn api(&self) -> &Arc<EconetApi> {
        &self.api
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Fetch a fresh snapshot
    pub async fn refresh(&self) -> Result<(), UpdateError> {
        debug!("Fetching data from API");

        match self.api.fetch_data().await {
            Ok(snapshot) => {
                let generation = {
                    let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                    state.data = Some(Arc::new(snapshot));
                    state.last_update_success = true;
                    state.generation += 1;
                    state.generation
                };
                self.updates.send_replace(generation);
                Ok(())
            }
            Err(err) => {
                self.state
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .last_update_success = false;

                let err = UpdateError::from(err);
                match &err {
                    UpdateError::AuthFailed => error!("{}", err),
                    UpdateError::UpdateFailed(_) => warn!("{}", err),
                }
                Err(err)
            }
        }
    }

    /// Initial refresh; the caller treats any failure as "not ready"
    pub async fn first_refresh(&self) -> Result<(), UpdateError> {
        self.refresh().await
    }

    /// Poll every `update_interval` until `shutdown` turns true
    ///
    /// The first tick fires one interval after the call, since setup already
    /// performed the first refresh. Returns `Err(AuthFailed)` if polling had
    /// to stop because the device rejected the credentials.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), UpdateError> {
        let start = tokio::time::Instant::now() + self.update_interval;
        let mut ticker = tokio::time::interval_at(start, self.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(UpdateError::AuthFailed) = self.refresh().await {
                        return Err(UpdateError::AuthFailed);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Polling stopped");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Receiver notified with the snapshot generation after every successful poll
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    /// Latest good snapshot, if any poll has succeeded yet
    pub fn snapshot(&self) -> Option<Arc<ParameterSnapshot>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .data
            .clone()
    }

    pub fn has_data(&self, key: &str) -> bool {
        self.snapshot().is_some_and(|data| data.contains_key(key))
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.snapshot().and_then(|data| data.get(key).cloned())
    }

    pub fn last_update_success(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_update_success
    }

    /// Number of successful polls so far
    pub fn generation(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}

impl std::fmt::Debug for DataCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCoordinator")
            .field("update_interval", &self.update_interval)
            .field("generation", &self.generation())
            .field("last_update_success", &self.last_update_success())
            .finish()
    }
}
