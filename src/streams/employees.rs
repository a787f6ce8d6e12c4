//! Employees: passthrough of the employee directory. Opt-in.

use super::Stream;
use crate::config::TapConfig;
use crate::decode::{extract_records, RECORDS_PATH};
use crate::error::Result;
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{JsonObject, JsonValue};
use chrono::NaiveDate;

/// `/employees`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeStream;

impl Stream for EmployeeStream {
    fn name(&self) -> &'static str {
        "employees"
    }

    fn path(&self, _config: &TapConfig, _today: NaiveDate) -> String {
        "/employees".to_string()
    }

    fn primary_keys(&self) -> &'static [&'static str] {
        &["employeeId"]
    }

    fn replication_key(&self) -> Option<&'static str> {
        Some("lastModified")
    }

    fn schema(&self) -> JsonSchema {
        let string = |d: &str| SchemaProperty::nullable(JsonType::String).with_description(d);
        let integer = |d: &str| SchemaProperty::nullable(JsonType::Integer).with_description(d);

        JsonSchema::new()
            .with_title(self.name())
            .property("employeeId", integer("The employee's ID"))
            .property("name", string("The employee's name"))
            .property("email", string("The employee's email address"))
            .property("employeeNo", string("The employee's number"))
            .property("dateOfJoin", string("The employee's date of joining"))
            .property("leavingDate", string("The employee's leaving date"))
            .property("originalHireDate", string("The employee's original hire date"))
            .property(
                "leftorg",
                SchemaProperty::nullable(JsonType::Boolean)
                    .with_description("If the employee left the organization"),
            )
            .property("lastModified", string("Last modified date"))
            .property("status", integer("The employee's status"))
            .property("dateOfBirth", string("The employee's date of birth"))
            .property("gender", string("The employee's gender"))
            .property("probationPeriod", integer("The employee's probation period"))
            .property("personalEmail2", string("The employee's secondary personal email"))
            .property("personalEmail3", string("The employee's tertiary personal email"))
            .property("mobile", string("The employee's mobile number"))
    }

    fn parse_page(&self, body: &JsonValue) -> Result<Vec<JsonObject>> {
        Ok(extract_records(body, RECORDS_PATH)?
            .into_iter()
            .filter_map(|record| match record {
                JsonValue::Object(obj) => Some(obj),
                _ => None,
            })
            .collect())
    }
}
