//! Attendance insights: one record per employee with the selected averages
//! and day counts pulled out of the typed `insights` arrays

use super::Stream;
use crate::config::TapConfig;
use crate::decode::{extract_records, RECORDS_PATH};
use crate::error::Result;
use crate::pagination::{self, PageToken};
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{JsonObject, JsonValue, StringMap};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// `insights.averages[].type` values that map to `average_<type>`
pub const AVERAGE_TYPES: [&str; 6] = [
    "workHours",
    "actualWorkHours",
    "inTime",
    "outTime",
    "workHoursDiff",
    "actualWorkHoursDiff",
];

/// `insights.days[].type` values that map to `day_<type>`
pub const DAY_TYPES: [&str; 4] = ["penalty", "lateIn", "earlyOut", "exception"];

/// `/attendance/v2/employee/insights`
#[derive(Debug, Clone, Copy, Default)]
pub struct AttendanceInsightsStream;

impl Stream for AttendanceInsightsStream {
    fn name(&self) -> &'static str {
        "attendance_insights"
    }

    fn path(&self, _config: &TapConfig, _today: NaiveDate) -> String {
        "/attendance/v2/employee/insights".to_string()
    }

    fn primary_keys(&self) -> &'static [&'static str] {
        &["employee"]
    }

    fn schema(&self) -> JsonSchema {
        let mut status = BTreeMap::new();
        status.insert("type".to_string(), SchemaProperty::nullable(JsonType::String));
        status.insert("days".to_string(), SchemaProperty::nullable(JsonType::Number));

        JsonSchema::new()
            .with_title(self.name())
            .property("employee", SchemaProperty::nullable(JsonType::Integer))
            .property("average_workHours", SchemaProperty::nullable(JsonType::String))
            .property(
                "average_actualWorkHours",
                SchemaProperty::nullable(JsonType::String),
            )
            .property("average_inTime", SchemaProperty::nullable(JsonType::String))
            .property("average_outTime", SchemaProperty::nullable(JsonType::String))
            .property(
                "average_workHoursDiff",
                SchemaProperty::nullable(JsonType::Integer),
            )
            .property(
                "average_actualWorkHoursDiff",
                SchemaProperty::nullable(JsonType::Integer),
            )
            .property("day_penalty", SchemaProperty::nullable(JsonType::Integer))
            .property("day_lateIn", SchemaProperty::nullable(JsonType::Integer))
            .property("day_earlyOut", SchemaProperty::nullable(JsonType::Integer))
            .property("day_exception", SchemaProperty::nullable(JsonType::Integer))
            .property(
                "status",
                SchemaProperty::array(SchemaProperty::object(status)),
            )
    }

    fn build_params(
        &self,
        previous_token: Option<PageToken>,
        config: &TapConfig,
        today: NaiveDate,
    ) -> StringMap {
        let mut params = pagination::page_params(previous_token);
        let (default_start, default_end) = previous_month_range(today);
        params.insert(
            "start".to_string(),
            config.start.unwrap_or(default_start).to_string(),
        );
        params.insert(
            "end".to_string(),
            config.end.unwrap_or(default_end).to_string(),
        );
        params
    }

    fn parse_page(&self, body: &JsonValue) -> Result<Vec<JsonObject>> {
        flatten_attendance_insights(body)
    }
}

/// First and last day of the calendar month before `today`
pub fn previous_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let end = first_of_month.pred_opt().unwrap_or(first_of_month);
    let start = end.with_day(1).unwrap_or(end);
    (start, end)
}

/// Flatten `{data: [{employee, insights: {averages, days, status}}]}`.
///
/// Metric fields start as null and are filled from entries whose `type`
/// is known; other entries are ignored. `status` is passed through as-is.
pub fn flatten_attendance_insights(body: &JsonValue) -> Result<Vec<JsonObject>> {
    let mut rows = Vec::new();

    for record in extract_records(body, RECORDS_PATH)? {
        let Some(record) = record.as_object() else {
            continue;
        };
        let insights = record.get("insights").and_then(JsonValue::as_object);

        let mut row = JsonObject::new();
        row.insert(
            "employee".to_string(),
            record.get("employee").cloned().unwrap_or(JsonValue::Null),
        );
        for tag in AVERAGE_TYPES {
            row.insert(format!("average_{tag}"), JsonValue::Null);
        }
        for tag in DAY_TYPES {
            row.insert(format!("day_{tag}"), JsonValue::Null);
        }
        row.insert(
            "status".to_string(),
            insights
                .and_then(|i| i.get("status"))
                .cloned()
                .unwrap_or_else(|| JsonValue::Array(Vec::new())),
        );

        apply_tagged(
            &mut row,
            entries(insights, "averages"),
            "average",
            &AVERAGE_TYPES,
            "average",
        );
        apply_tagged(&mut row, entries(insights, "days"), "day", &DAY_TYPES, "days");

        rows.push(row);
    }

    Ok(rows)
}

fn entries<'a>(insights: Option<&'a JsonObject>, key: &str) -> &'a [JsonValue] {
    insights
        .and_then(|i| i.get(key))
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Write `entry[value_key]` into `<prefix>_<type>` for every known type
fn apply_tagged(
    row: &mut JsonObject,
    entries: &[JsonValue],
    prefix: &str,
    known: &[&str],
    value_key: &str,
) {
    for entry in entries.iter().filter_map(JsonValue::as_object) {
        let Some(tag) = entry.get("type").and_then(JsonValue::as_str) else {
            continue;
        };
        if known.contains(&tag) {
            row.insert(
                format!("{prefix}_{tag}"),
                entry.get(value_key).cloned().unwrap_or(JsonValue::Null),
            );
        }
    }
}
