//! Value rendering for sensor entities
//!
//! Each sensor description names one [`ValueFormat`]; applying it to the raw
//! register value yields the state shown to the host, or `None` when the raw
//! value cannot be rendered (the entity then reports no state).

use serde::Serialize;
use serde_json::Value;

use crate::params::operation_mode_name;

/// Pure transformation from raw register value to displayed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Pass the value through
    Identity,
    /// Round numbers to the given number of decimals
    Round(u8),
    /// Registers stored in tenths (lambda levels)
    DivideByTen,
    /// `1` -> `"ON"`, `0` -> `"OFF"`
    OnOff,
    /// Lambda probe state machine
    LambdaStatus,
    /// Boiler operation mode name
    OperationMode,
}

impl ValueFormat {
    pub fn apply(&self, raw: &Value) -> Option<Value> {
        match self {
            ValueFormat::Identity => Some(raw.clone()),
            ValueFormat::Round(decimals) => round(raw, *decimals),
            ValueFormat::DivideByTen => raw.as_f64().map(|x| Value::from(x / 10.0)),
            ValueFormat::OnOff => match as_text(raw)?.trim() {
                "1" => Some(Value::from("ON")),
                "0" => Some(Value::from("OFF")),
                _ => None,
            },
            ValueFormat::LambdaStatus => {
                let label = match raw.as_u64() {
                    Some(0) => "Stop",
                    Some(1) => "Start",
                    Some(2) => "Working",
                    _ => "Unknown",
                };
                Some(Value::from(label))
            }
            ValueFormat::OperationMode => match raw.as_u64().and_then(operation_mode_name) {
                Some(name) => Some(Value::from(name)),
                None => Some(raw.clone()),
            },
        }
    }
}

fn round(raw: &Value, decimals: u8) -> Option<Value> {
    if raw.is_i64() || raw.is_u64() {
        return Some(raw.clone());
    }
    let x = raw.as_f64()?;
    let factor = 10f64.powi(i32::from(decimals));
    Some(Value::from((x * factor).round() / factor))
}

fn as_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
