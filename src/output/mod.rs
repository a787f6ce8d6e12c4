//! Output module
//!
//! Singer-style messages and the sinks they are written to.
//!
//! # Overview
//!
//! This module provides:
//! - `Message` - SCHEMA, RECORD and STATE messages, tagged by `"type"`
//! - `MessageSink` - where the engine sends messages
//! - `JsonLinesWriter` - one JSON object per line on any `Write`

mod message;
mod writer;

pub use message::Message;
pub use writer::{JsonLinesWriter, MessageSink};

#[cfg(test)]
mod tests;
