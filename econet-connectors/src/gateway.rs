//! Parameter Gateway
//!
//! Sits between the raw [`EconetClient`] and everything that wants
//! parameters by name: the polling coordinator and the entities.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──initialize()──▶ Ready(DeviceIdentity)
//! ```
//!
//! `initialize` reads the controller identity from `sysParams`. Missing
//! identity fields are tolerated; each keeps its placeholder and logs a
//! warning. `initialize` may be called again after a reconnect.
//!
//! ## Reads
//!
//! `fetch_data` merges `regParams.curr` with `sysParams` into one flat
//! snapshot (system parameters win on key collisions). Either half missing
//! fails the whole fetch with [`EconetError::Data`].
//!
//! ## Limits and writes
//!
//! Both go through the name -> index mapping table. The limits table is
//! fetched once and cached without expiry. A successful write is mirrored
//! into the cache straight away so readers see the new value before the
//! next poll confirms it.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, warn};
use serde_json::Value;

use econet_core::cache::{MemCache, NEVER_EXPIRES};
use econet_core::constants::{
    API_EDITABLE_PARAMS_LIMITS_DATA, API_EDITABLE_PARAMS_LIMITS_URI, API_REG_PARAMS_PARAM_DATA,
    API_REG_PARAMS_URI, API_SET_PARAM_RESULT, API_SET_PARAM_RESULT_OK, API_SYS_PARAMS_PARAM_HW_VER,
    API_SYS_PARAMS_PARAM_SW_REV, API_SYS_PARAMS_PARAM_UID, API_SYS_PARAMS_URI,
};
use econet_core::{map_param, DeviceIdentity, EconetError, EconetResult, Limits, ParameterSnapshot};

use crate::http::{EconetClient, JsonObject};

#[derive(Debug, Clone, PartialEq, Eq)]
enum GatewayState {
    Uninitialized,
    Ready(DeviceIdentity),
}

/// Name-based access to controller parameters
pub struct EconetApi {
    client: EconetClient,
    cache: Mutex<MemCache<Value>>,
    state: RwLock<GatewayState>,
}

impl EconetApi {
    /// Create an uninitialized gateway
    pub fn new(client: EconetClient, cache: MemCache<Value>) -> Self {
        Self {
            client,
            cache: Mutex::new(cache),
            state: RwLock::new(GatewayState::Uninitialized),
        }
    }

    /// Create a gateway and read the controller identity
    pub async fn create(client: EconetClient, cache: MemCache<Value>) -> EconetResult<Self> {
        let api = Self::new(client, cache);
        api.initialize().await?;
        Ok(api)
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.read_state(), GatewayState::Ready(_))
    }

    /// Controller identity; placeholders until initialized
    pub fn identity(&self) -> DeviceIdentity {
        match &*self.read_state() {
            GatewayState::Ready(identity) => identity.clone(),
            GatewayState::Uninitialized => DeviceIdentity::default(),
        }
    }

    pub fn uid(&self) -> String {
        self.identity().uid
    }

    pub fn sw_revision(&self) -> String {
        self.identity().sw_revision
    }

    pub fn hw_version(&self) -> String {
        self.identity().hw_version
    }

    /// Read uid, software revision and hardware version from `sysParams`
    pub async fn initialize(&self) -> EconetResult<()> {
        let sys_params = self.fetch_params(API_SYS_PARAMS_URI).await?;

        let mut identity = DeviceIdentity::default();
        if let Some(uid) = identity_field(&sys_params, API_SYS_PARAMS_PARAM_UID, "UUID") {
            identity.uid = uid;
        }
        if let Some(sw) = identity_field(&sys_params, API_SYS_PARAMS_PARAM_SW_REV, "sw_revision") {
            identity.sw_revision = sw;
        }
        if let Some(hw) = identity_field(&sys_params, API_SYS_PARAMS_PARAM_HW_VER, "hw_version") {
            identity.hw_version = hw;
        }

        debug!("Controller identity: {:?}", identity);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = GatewayState::Ready(identity);
        Ok(())
    }

    /// Fetch merged `regParams.curr` and `sysParams`
    pub async fn fetch_data(&self) -> EconetResult<ParameterSnapshot> {
        let reg_params = self
            .fetch_reg_key(API_REG_PARAMS_URI, API_REG_PARAMS_PARAM_DATA)
            .await?;
        let Value::Object(mut snapshot) = reg_params else {
            return Err(EconetError::Data(format!(
                "Data for key: {} is not an object",
                API_REG_PARAMS_PARAM_DATA
            )));
        };

        let sys_params = self.fetch_params(API_SYS_PARAMS_URI).await?;
        snapshot.extend(sys_params);

        Ok(snapshot)
    }

    /// Device-reported bounds of an editable parameter
    pub async fn get_param_limits(&self, param: &str) -> EconetResult<Option<Limits>> {
        let Some(param_idx) = map_param(param) else {
            warn!(
                "Requested param limits for: '{}' but mapping for this param does not exist",
                param
            );
            return Ok(None);
        };

        let cached = self.lock_cache().get(API_EDITABLE_PARAMS_LIMITS_DATA).cloned();
        let limits = match cached {
            Some(limits) => limits,
            None => {
                let limits = self
                    .fetch_reg_key(API_EDITABLE_PARAMS_LIMITS_URI, API_EDITABLE_PARAMS_LIMITS_DATA)
                    .await?;
                self.lock_cache()
                    .set_with_ttl(API_EDITABLE_PARAMS_LIMITS_DATA, limits.clone(), NEVER_EXPIRES);
                limits
            }
        };

        let Some(curr_limits) = limits.get(param_idx) else {
            warn!(
                "Requested param limits for: '{}({})' but limits for this param do not exist",
                param, param_idx
            );
            return Ok(None);
        };

        match serde_json::from_value::<Limits>(curr_limits.clone()) {
            Ok(limits) => Ok(Some(limits)),
            Err(e) => {
                warn!("Malformed limits for '{}({})': {}", param, param_idx, e);
                Ok(None)
            }
        }
    }

    /// Write a parameter; `Ok(true)` only when the device answers `result: OK`
    pub async fn set_param(&self, param: &str, value: impl Into<Value>) -> EconetResult<bool> {
        let value = value.into();
        let Some(param_idx) = map_param(param) else {
            warn!(
                "Requested param set for: '{}' but mapping for this param does not exist",
                param
            );
            return Ok(false);
        };

        let Some(data) = self.client.set_param(param_idx, &value).await? else {
            warn!("Setting '{}' to {} returned no data", param, value);
            return Ok(false);
        };

        match data.get(API_SET_PARAM_RESULT).and_then(Value::as_str) {
            Some(API_SET_PARAM_RESULT_OK) => {}
            other => {
                warn!("Setting '{}' to {} rejected: {:?}", param, value, other);
                return Ok(false);
            }
        }

        self.lock_cache().set(param, value);
        Ok(true)
    }

    /// Value written by a recent successful `set_param`, if still cached
    pub fn cached_value(&self, param: &str) -> Option<Value> {
        self.lock_cache().get(param).cloned()
    }

    /// Fetch a whole endpoint; no data is a hard failure
    async fn fetch_params(&self, reg: &str) -> EconetResult<JsonObject> {
        self.client.get_params(reg).await?.ok_or_else(|| {
            EconetError::Data(format!("Data fetched by API for reg: {} is None", reg))
        })
    }

    /// Fetch an endpoint and take one top-level key out of it
    async fn fetch_reg_key(&self, reg: &str, data_key: &str) -> EconetResult<Value> {
        let mut data = self.fetch_params(reg).await?;

        match data.remove(data_key) {
            Some(value) => Ok(value),
            None => {
                debug!("{:?}", data);
                Err(EconetError::Data(format!(
                    "Data for key: {} does not exist",
                    data_key
                )))
            }
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, MemCache<Value>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, GatewayState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EconetApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EconetApi")
            .field("host", &self.host())
            .field("state", &*self.read_state())
            .finish()
    }
}

fn identity_field(sys_params: &JsonObject, key: &str, label: &str) -> Option<String> {
    match sys_params.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => {
            warn!("{} not in sys_params - cannot set proper {}", key, label);
            None
        }
        Some(other) => Some(other.to_string()),
    }
}
