//! Integer coercion for flattened numeric fields
//!
//! Absence is decided by the key: a present `0`, `0.0` or `"0"` is a real
//! value and is kept.

use crate::types::{JsonObject, JsonValue};
use tracing::warn;

/// Read `key` from `obj` as an integer, `0` when the key is absent or null.
///
/// Values that cannot be read as a number also become `0`, with a warning.
pub fn coerce_int(obj: &JsonObject, key: &str) -> i64 {
    match obj.get(key) {
        None | Some(JsonValue::Null) => 0,
        Some(value) => to_int(value).unwrap_or_else(|| {
            warn!("Field '{key}' is not numeric ({value}), using 0");
            0
        }),
    }
}

/// Integer reading of a JSON value: floats truncate toward zero, numeric
/// strings are parsed, booleans map to 0/1
pub fn to_int(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        JsonValue::Bool(b) => Some(i64::from(*b)),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
