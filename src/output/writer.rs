//! Message sinks
//!
//! The engine never prints; it hands every message to a sink. The CLI uses
//! a JSON-lines writer on stdout, tests collect into a `Vec`.

use super::message::Message;
use crate::error::{Error, Result};
use std::io::Write;

/// Destination for sync messages
pub trait MessageSink {
    /// Accept one message
    fn emit(&mut self, message: Message) -> Result<()>;
}

impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// Writes one JSON object per line, flushing after each message
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    pretty: bool,
    messages_written: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Create a compact writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            messages_written: 0,
        }
    }

    /// Create a writer that pretty-prints each message
    pub fn pretty(writer: W) -> Self {
        Self {
            pretty: true,
            ..Self::new(writer)
        }
    }

    /// Number of messages written so far
    #[must_use]
    pub fn messages_written(&self) -> usize {
        self.messages_written
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesWriter<std::io::Stdout> {
    /// Compact writer on stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MessageSink for JsonLinesWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        let line = if self.pretty {
            serde_json::to_string_pretty(&message)
        } else {
            serde_json::to_string(&message)
        }
        .map_err(|e| Error::output(format!("Failed to serialize message: {e}")))?;

        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .map_err(|e| Error::output(format!("Failed to write message: {e}")))?;

        self.messages_written += 1;
        Ok(())
    }
}
