//! State management module
//!
//! Bookmarks let an incremental stream resume where the previous run
//! stopped. The state document is Singer-shaped:
//!
//! ```json
//! {"bookmarks": {"employees": {"replication_key": "lastModified",
//!                              "replication_key_value": "2024-05-01T10:00:00"}}}
//! ```
//!
//! Full-table streams never write a bookmark; their STATE messages carry
//! whatever the document already held.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{newer_cursor, State, StreamState};

#[cfg(test)]
mod tests;
