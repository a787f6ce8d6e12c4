//! Schema module
//!
//! JSON-schema value types used to declare the tap's configuration options
//! and the shape of every record a stream emits.

mod types;

pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
