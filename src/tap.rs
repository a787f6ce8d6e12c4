//! The tap: configuration plus the stream list
//!
//! `Tap` is what the CLI talks to. It owns the validated configuration and
//! answers the four questions a runner asks: what is the config schema,
//! do the credentials work, which streams exist, and which ones to read.

use crate::auth::{Authenticator, Credentials};
use crate::config::TapConfig;
use crate::engine::SyncEngine;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::schema::JsonSchema;
use crate::state::StateManager;
use crate::streams::{self, Stream};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Tap name reported by `spec`
pub const TAP_NAME: &str = "tap-greythr";

// ============================================================================
// Spec / Check / Catalog
// ============================================================================

/// Tap specification returned by `spec`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapSpec {
    /// Tap name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Configuration schema
    pub spec: JsonSchema,
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable stream id
    pub tap_stream_id: String,
    /// Stream name
    pub stream: String,
    /// Record schema
    pub schema: JsonValue,
    /// Primary key fields
    pub key_properties: Vec<String>,
    /// Replication key, for incremental streams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
}

impl CatalogEntry {
    fn from_stream(stream: &dyn Stream) -> Self {
        Self {
            tap_stream_id: stream.name().to_string(),
            stream: stream.name().to_string(),
            schema: stream.schema().to_json(),
            key_properties: stream
                .primary_keys()
                .iter()
                .map(ToString::to_string)
                .collect(),
            replication_key: stream.replication_key().map(ToString::to_string),
        }
    }
}

/// Discovered streams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog entries
    pub streams: Vec<CatalogEntry>,
}

// ============================================================================
// Tap
// ============================================================================

/// greytHR tap
#[derive(Debug, Clone)]
pub struct Tap {
    config: TapConfig,
}

impl Tap {
    /// Create a tap from a validated configuration
    pub fn new(config: TapConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(TapConfig::from_file(path)?))
    }

    /// The configuration in use
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Configuration schema
    pub fn spec() -> TapSpec {
        TapSpec {
            name: TAP_NAME.to_string(),
            title: "greytHR".to_string(),
            description: Some("Leave balances and attendance insights from the greytHR API".to_string()),
            spec: TapConfig::json_schema(),
        }
    }

    /// Streams synced by default
    pub fn discover_streams(&self) -> Vec<Box<dyn Stream>> {
        streams::enabled_streams()
    }

    /// Streams to read: the named ones in the order given, or every
    /// discovered stream when no names are given
    pub fn select_streams(&self, names: Option<&[String]>) -> Result<Vec<Box<dyn Stream>>> {
        let Some(names) = names.filter(|n| !n.is_empty()) else {
            return Ok(self.discover_streams());
        };

        let mut selected: Vec<Box<dyn Stream>> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            if selected.iter().any(|s| s.name() == name) {
                warn!("Stream '{name}' selected twice, reading it once");
                continue;
            }
            selected.push(streams::stream_by_name(name).ok_or_else(|| Error::stream_not_found(name))?);
        }
        Ok(selected)
    }

    /// Catalog of the discovered streams
    pub fn catalog(&self) -> Catalog {
        Catalog {
            streams: self
                .discover_streams()
                .iter()
                .map(|s| CatalogEntry::from_stream(s.as_ref()))
                .collect(),
        }
    }

    /// HTTP client for the data API
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_config(HttpClientConfig::from_tap_config(&self.config))
    }

    /// Sync engine bound to this tap's configuration
    pub fn engine(&self, state: StateManager) -> Result<SyncEngine> {
        Ok(SyncEngine::new(self.http_client()?, self.config.clone(), state))
    }

    /// Verify the credentials with one token exchange
    pub async fn check(&self) -> Result<CheckResult> {
        let client = self.http_client()?;
        let authenticator =
            Authenticator::with_client(Credentials::from(&self.config), client.inner().clone());

        match authenticator.authenticate().await {
            Ok(_) => {
                info!("Connection check succeeded for {}", self.config.domain_host());
                Ok(CheckResult::success())
            }
            Err(e) => {
                warn!("Connection check failed: {e}");
                Ok(CheckResult::failure(e.to_string()))
            }
        }
    }
}
