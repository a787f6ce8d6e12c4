//! Leave balances: one record per employee per leave type category

use super::Stream;
use crate::config::TapConfig;
use crate::decode::{coerce_int, extract_records, RECORDS_PATH};
use crate::error::Result;
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{JsonObject, JsonValue};
use chrono::NaiveDate;

/// Numeric fields copied from each summary, in schema order
pub const SUMMARY_FIELDS: [&str; 9] = [
    "leaveTypeCategory",
    "balance",
    "ob",
    "grant",
    "availed",
    "applied",
    "lapsed",
    "deducted",
    "encashed",
];

/// `/leave/v2/employee/years/{year}/balance`
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveBalanceStream;

impl Stream for LeaveBalanceStream {
    fn name(&self) -> &'static str {
        "leave_balances"
    }

    fn path(&self, config: &TapConfig, today: NaiveDate) -> String {
        format!(
            "/leave/v2/employee/years/{}/balance",
            config.leave_year(today)
        )
    }

    fn primary_keys(&self) -> &'static [&'static str] {
        &["employeeId", "leaveTypeCategory"]
    }

    fn schema(&self) -> JsonSchema {
        let schema = JsonSchema::new()
            .with_title(self.name())
            .property("employeeId", SchemaProperty::nullable(JsonType::Integer));
        SUMMARY_FIELDS.iter().fold(schema, |schema, field| {
            schema.property(field, SchemaProperty::nullable(JsonType::Integer))
        })
    }

    fn parse_page(&self, body: &JsonValue) -> Result<Vec<JsonObject>> {
        flatten_leave_balances(body)
    }
}

/// Flatten `{data: [{employeeId, summaries: [...]}]}` into one row per
/// summary. Every numeric field is an integer, `0` when its key is absent.
/// Employees without summaries contribute nothing.
pub fn flatten_leave_balances(body: &JsonValue) -> Result<Vec<JsonObject>> {
    let mut rows = Vec::new();

    for employee in extract_records(body, RECORDS_PATH)? {
        let Some(employee) = employee.as_object() else {
            continue;
        };
        let employee_id = coerce_int(employee, "employeeId");

        let summaries = employee
            .get("summaries")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for summary in summaries.iter().filter_map(JsonValue::as_object) {
            let mut row = JsonObject::new();
            row.insert("employeeId".to_string(), employee_id.into());
            for field in SUMMARY_FIELDS {
                row.insert(field.to_string(), coerce_int(summary, field).into());
            }
            rows.push(row);
        }
    }

    Ok(rows)
}
