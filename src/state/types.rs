//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the bookmark for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.bookmarks.get(stream)
    }

    /// Get the mutable bookmark for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Get the replication key value for a stream
    pub fn get_cursor(&self, stream: &str) -> Option<&str> {
        self.bookmarks
            .get(stream)?
            .replication_key_value
            .as_deref()
    }

    /// Set the replication key and its value for a stream
    pub fn set_cursor(&mut self, stream: &str, replication_key: &str, value: String) {
        let entry = self.get_stream_mut(stream);
        entry.replication_key = Some(replication_key.to_string());
        entry.replication_key_value = Some(value);
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_else(|_| JsonValue::Object(Default::default()))
    }
}

/// Bookmark for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Field the bookmark tracks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Largest value of the field seen so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<String>,
}

/// Pick the later of the current cursor and a record's replication value.
///
/// Values are compared as strings; greytHR timestamps are ISO-8601 so the
/// lexical order is the chronological one. Null or missing values never
/// move the cursor.
pub fn newer_cursor(current: Option<&str>, candidate: Option<&JsonValue>) -> Option<String> {
    let candidate = match candidate? {
        JsonValue::Null => return None,
        JsonValue::String(s) if s.is_empty() => return None,
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    match current {
        Some(current) if current >= candidate.as_str() => None,
        _ => Some(candidate),
    }
}
