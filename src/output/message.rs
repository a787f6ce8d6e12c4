//! Output message types

use crate::schema::JsonSchema;
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message emitted during sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Record schema, sent once before a stream's records
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the records
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// A single flattened record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: JsonObject,
        /// When the page holding the record was fetched
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<DateTime<Utc>>,
    },
    /// Full state document
    State {
        /// Current bookmarks
        value: JsonValue,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: &JsonSchema,
        key_properties: &[&str],
        replication_key: Option<&str>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema: schema.to_json(),
            key_properties: key_properties.iter().map(ToString::to_string).collect(),
            bookmark_properties: replication_key.into_iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a record message
    pub fn record(
        stream: impl Into<String>,
        record: JsonObject,
        time_extracted: Option<DateTime<Utc>>,
    ) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted,
        }
    }

    /// Create a state message
    pub fn state(value: JsonValue) -> Self {
        Self::State { value }
    }

    /// Stream the message belongs to, if any
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}
