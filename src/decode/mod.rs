//! Response decoding
//!
//! Helpers shared by the streams for pulling records out of a page body and
//! for reading individual fields permissively: a missing key never raises,
//! it falls back to a default.

mod coerce;
mod extract;

pub use coerce::{coerce_int, to_int};
pub use extract::{extract_records, get_path, is_truthy, RECORDS_PATH};
