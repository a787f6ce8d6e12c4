//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Runs streams one after another with state management
//! - `SyncConfig` - Page and record caps
//! - `SyncStats` - Counters for a run
//!
//! Each stream run is: token exchange, SCHEMA, then one GET per page until
//! the stream reports no next page, then STATE. One request is in flight
//! at a time and the first error ends the run.

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::auth::{Authenticator, Credentials};
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::output::{Message, MessageSink};
use crate::pagination::PaginationState;
use crate::state::{newer_cursor, StateManager};
use crate::streams::Stream;
use crate::types::{Clock, SystemClock};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client for data requests
    client: HttpClient,
    /// Tap configuration
    tap_config: TapConfig,
    /// State manager
    state: StateManager,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
    /// Source of "today" for request parameters
    clock: Box<dyn Clock>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, tap_config: TapConfig, state: StateManager) -> Self {
        let config = SyncConfig::new().with_max_pages(tap_config.max_pages());
        Self {
            client,
            tap_config,
            state,
            config,
            stats: SyncStats::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = SyncStats::default();
    }

    /// Sync every stream in order, stopping at the first error
    pub async fn sync_all(
        &mut self,
        streams: &[Box<dyn Stream>],
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let start = Instant::now();

        for stream in streams {
            self.sync_stream(stream.as_ref(), sink).await?;
        }

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Sync complete: {} records in {} pages across {} streams",
            self.stats.records_synced, self.stats.pages_fetched, self.stats.streams_synced
        );
        Ok(self.stats.clone())
    }

    /// Sync a single stream
    pub async fn sync_stream(
        &mut self,
        stream: &dyn Stream,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let name = stream.name();
        info!("Starting sync for stream: {name}");

        let authenticator = Authenticator::with_client(
            Credentials::from(&self.tap_config),
            self.client.inner().clone(),
        );
        let auth_headers = authenticator.authenticate().await?;

        sink.emit(Message::schema(
            name,
            &stream.schema(),
            stream.primary_keys(),
            stream.replication_key(),
        ))?;

        let mut pagination = PaginationState::new();
        let mut bookmark = self.state.get_cursor(name).await;
        let mut bookmark_moved = false;
        let mut emitted = 0usize;

        while !pagination.done {
            // `today` is read per request
            let today = self.clock.today();
            let path = stream.path(&self.tap_config, today);
            let request = RequestConfig::new()
                .queries(stream.build_params(pagination.token, &self.tap_config, today))
                .headers(auth_headers.to_map());

            let body = self.client.get_json(&path, request).await?;
            let extracted_at = Utc::now();
            self.stats.add_page();

            let records = stream.parse_page(&body)?;
            let next = stream.next_page_token(&body, pagination.token);
            debug!(
                "{name} page {}: {} records, next {:?}",
                pagination.pages_fetched + 1,
                records.len(),
                next
            );
            pagination.advance(records.len(), next);

            let emitted_before = emitted;
            for record in records {
                if self.config.records_exhausted(emitted) {
                    break;
                }
                if let Some(key) = stream.replication_key() {
                    if let Some(value) = newer_cursor(bookmark.as_deref(), record.get(key)) {
                        bookmark = Some(value);
                        bookmark_moved = true;
                    }
                }
                sink.emit(Message::record(name, record, Some(extracted_at)))?;
                emitted += 1;
            }
            self.stats.add_records(emitted - emitted_before);

            if self.config.records_exhausted(emitted) {
                debug!("{name}: record limit {} reached", self.config.max_records);
                pagination.mark_done();
            } else if !pagination.done && pagination.pages_fetched >= self.config.max_pages {
                return Err(Error::PageLimitExceeded {
                    stream: name.to_string(),
                    max_pages: self.config.max_pages,
                });
            }
        }

        if let (Some(key), Some(value), true) = (stream.replication_key(), bookmark, bookmark_moved)
        {
            self.state.set_cursor(name, key, value).await?;
        }
        sink.emit(Message::state(self.state.to_value().await))?;

        self.stats.add_stream();
        info!(
            "Completed sync for {name}: {emitted} records in {} pages",
            pagination.pages_fetched
        );
        Ok(())
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
