//! Endpoint streams
//!
//! Each stream is one greytHR list endpoint with its own path, record
//! schema, query parameters and page flattening. The engine drives them all
//! through the same paginating fetch loop via the [`Stream`] trait.
//!
//! Adding an endpoint means implementing [`Stream`] and listing it in
//! [`enabled_streams`] (or only in [`available_streams`] to keep it opt-in,
//! as `employees` is).

mod attendance_insights;
mod employees;
mod leave_balances;

pub use attendance_insights::{
    flatten_attendance_insights, previous_month_range, AttendanceInsightsStream, AVERAGE_TYPES,
    DAY_TYPES,
};
pub use employees::EmployeeStream;
pub use leave_balances::{flatten_leave_balances, LeaveBalanceStream, SUMMARY_FIELDS};

use crate::config::TapConfig;
use crate::error::Result;
use crate::pagination::{self, PageToken};
use crate::schema::JsonSchema;
use crate::types::{JsonObject, JsonValue, StringMap};
use chrono::NaiveDate;

/// One extractable endpoint
pub trait Stream: Send + Sync {
    /// Stream name used in output messages and the catalog
    fn name(&self) -> &'static str;

    /// Request path relative to the API root
    fn path(&self, config: &TapConfig, today: NaiveDate) -> String;

    /// Fields that uniquely identify a record
    fn primary_keys(&self) -> &'static [&'static str];

    /// Field tracking incremental progress, if any
    fn replication_key(&self) -> Option<&'static str> {
        None
    }

    /// Schema of the emitted records
    fn schema(&self) -> JsonSchema;

    /// Query parameters for the next request.
    ///
    /// `today` is read at request-build time so date-derived values follow
    /// the calendar during long runs.
    fn build_params(
        &self,
        previous_token: Option<PageToken>,
        _config: &TapConfig,
        _today: NaiveDate,
    ) -> StringMap {
        pagination::page_params(previous_token)
    }

    /// Token for the following page, `None` to stop
    fn next_page_token(
        &self,
        body: &JsonValue,
        previous_token: Option<PageToken>,
    ) -> Option<PageToken> {
        pagination::next_page_token(body, previous_token)
    }

    /// Flatten one page body into output records
    fn parse_page(&self, body: &JsonValue) -> Result<Vec<JsonObject>>;
}

impl std::fmt::Debug for dyn Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream").field("name", &self.name()).finish()
    }
}

/// Streams synced when no selection is given
pub fn enabled_streams() -> Vec<Box<dyn Stream>> {
    vec![
        Box::new(LeaveBalanceStream),
        Box::new(AttendanceInsightsStream),
    ]
}

/// Every stream the tap knows, including opt-in ones
pub fn available_streams() -> Vec<Box<dyn Stream>> {
    let mut streams = enabled_streams();
    streams.push(Box::new(EmployeeStream));
    streams
}

/// Look up a stream by name among all available streams
pub fn stream_by_name(name: &str) -> Option<Box<dyn Stream>> {
    available_streams().into_iter().find(|s| s.name() == name)
}
