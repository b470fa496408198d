//! Device Constants for the ecoNET-300 Controller
//!
//! Endpoint names, payload keys and device-info strings used across the
//! workspace. Endpoint names are relative to `{host}/econet/`.

// ===== INTEGRATION IDENTITY =====

/// Domain used in device identifiers
pub const DOMAIN: &str = "econet300";

pub const DEVICE_INFO_MANUFACTURER: &str = "PLUM";
pub const DEVICE_INFO_MODEL: &str = "ecoNET300";
pub const DEVICE_INFO_CONTROLLER_NAME: &str = "PLUM ecoNET300";
pub const DEVICE_INFO_MIXER_NAME: &str = "Mixer";

// ===== SYSTEM PARAMETERS =====

/// Device identity and firmware versions
pub const API_SYS_PARAMS_URI: &str = "sysParams";
pub const API_SYS_PARAMS_PARAM_UID: &str = "uid";
pub const API_SYS_PARAMS_PARAM_SW_REV: &str = "softVer";
pub const API_SYS_PARAMS_PARAM_HW_VER: &str = "routerType";

// ===== REGISTER PARAMETERS =====

/// Live register values, nested under `curr`
pub const API_REG_PARAMS_URI: &str = "regParams";
pub const API_REG_PARAMS_PARAM_DATA: &str = "curr";

// ===== EDITABLE PARAMETERS =====

/// Editable-parameter bounds, nested under `data` and keyed by numeric index
pub const API_EDITABLE_PARAMS_LIMITS_URI: &str = "rmCurrentDataParamsEdits";
pub const API_EDITABLE_PARAMS_LIMITS_DATA: &str = "data";

/// Parameter write endpoint
pub const API_SET_PARAM_URI: &str = "rmCurrNewParam";
pub const API_SET_PARAM_KEY: &str = "newParamKey";
pub const API_SET_PARAM_VALUE: &str = "newParamValue";

/// Field of a write response carrying the outcome
pub const API_SET_PARAM_RESULT: &str = "result";
pub const API_SET_PARAM_RESULT_OK: &str = "OK";

// ===== IDENTITY PLACEHOLDERS =====

pub const DEFAULT_UID: &str = "default-uid";
pub const DEFAULT_SW_REVISION: &str = "default-sw-revision";
pub const DEFAULT_HW_VERSION: &str = "default-hw-version";

// ===== TIMING =====

/// Per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Total attempts for a request that keeps timing out
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Pause between timed-out attempts (milliseconds)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Polling interval of the data coordinator (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Number of mixer circuits a controller can drive
pub const MIXER_COUNT: u8 = 4;
