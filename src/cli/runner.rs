//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::SyncConfig;
use crate::error::{Error, Result};
use crate::output::JsonLinesWriter;
use crate::state::StateManager;
use crate::tap::Tap;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing output to stdout
    pub async fn run(&self) -> Result<()> {
        self.run_to(std::io::stdout()).await
    }

    /// Run the CLI command, writing output to `out`
    pub async fn run_to<W: Write>(&self, mut out: W) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(&mut out),
            Commands::Check => self.check(&mut out).await,
            Commands::Discover => self.discover(&mut out),
            Commands::Read {
                streams,
                max_records,
            } => self.read(out, streams, *max_records).await,
        }
    }

    /// Load configuration
    fn load_tap(&self) -> Result<Tap> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return Ok(Tap::new(TapConfig::from_json_str(json_str)?));
        }

        if let Some(path) = &self.cli.config {
            return Tap::from_config_file(path);
        }

        Err(Error::config(
            "No configuration given; use --config or --config-json",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Show spec
    fn spec(&self, out: &mut impl Write) -> Result<()> {
        self.output_message(
            out,
            &json!({
                "type": "SPEC",
                "spec": Tap::spec()
            }),
        )
    }

    /// Check connection
    async fn check(&self, out: &mut impl Write) -> Result<()> {
        let tap = self.load_tap()?;
        let result = tap.check().await?;

        self.output_message(
            out,
            &json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": if result.success { "SUCCEEDED" } else { "FAILED" },
                    "message": result.message.clone().unwrap_or_else(|| "Connection successful".to_string())
                }
            }),
        )?;

        match result.message {
            Some(message) if !result.success => Err(Error::auth(message)),
            _ => Ok(()),
        }
    }

    /// Discover streams
    fn discover(&self, out: &mut impl Write) -> Result<()> {
        let tap = self.load_tap()?;
        self.output_message(out, &tap.catalog())
    }

    /// Read streams
    async fn read<W: Write>(
        &self,
        out: W,
        streams: &[String],
        max_records: Option<usize>,
    ) -> Result<()> {
        let tap = self.load_tap()?;
        let state = self.load_state()?;
        let selected = tap.select_streams(Some(streams))?;

        let mut sync_config = SyncConfig::new().with_max_pages(tap.config().max_pages());
        if let Some(max) = max_records {
            sync_config = sync_config.with_max_records(max);
        }

        let mut engine = tap.engine(state)?.with_config(sync_config);
        let mut sink = match self.cli.format {
            OutputFormat::Json => JsonLinesWriter::new(out),
            OutputFormat::Pretty => JsonLinesWriter::pretty(out),
        };

        let stats = engine
            .sync_all(&selected, &mut sink)
            .await?;

        if let Some(state_path) = &self.cli.state {
            engine.state().save_to_file(state_path).await?;
        }

        info!(
            "Read {} records from {} streams in {} ms",
            stats.records_synced, stats.streams_synced, stats.duration_ms
        );
        Ok(())
    }

    /// Output a single JSON document
    fn output_message(&self, out: &mut impl Write, msg: &impl Serialize) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg),
            OutputFormat::Pretty => serde_json::to_string_pretty(msg),
        }
        .map_err(|e| Error::output(format!("Failed to serialize output: {e}")))?;

        writeln!(out, "{text}").map_err(|e| Error::output(format!("Failed to write output: {e}")))
    }
}
