//! Record and field extraction

use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Where list endpoints put their rows
pub const RECORDS_PATH: &str = "$.data[*]";

/// Extract records using a JSONPath expression.
///
/// A path that matches nothing yields an empty list.
pub fn extract_records(body: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    match jp.find(body) {
        JsonValue::Array(arr) => Ok(arr),
        JsonValue::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

/// Follow a dotted path (`pages.hasNext`) through nested objects
pub fn get_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.')
        .try_fold(value, |current, part| current.as_object()?.get(part))
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are falsy
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}
