//! CLI runner - executes the tap

use crate::cli::commands::Cli;
use crate::config::TapConfig;
use crate::engine::SyncEngine;
use crate::error::{Error, Result, ResultExt};
use crate::schema::Catalog;
use crate::sink::SingerSink;
use crate::state::TapState;
use std::io::Write;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected mode
    ///
    /// Config and state are loaded and validated before anything is
    /// written to stdout.
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        debug!(config = ?config, "Loaded config");

        if self.cli.discover {
            return self.discover();
        }

        let state = self.load_state()?;
        self.sync(&config, &state).await
    }

    /// Config from `--config` or `--config-json`
    pub(crate) fn load_config(&self) -> Result<TapConfig> {
        match (&self.cli.config, &self.cli.config_json) {
            (_, Some(json)) => TapConfig::from_json(json),
            (Some(path), None) => TapConfig::from_file(path),
            (None, None) => Err(Error::config(
                "Either --config or --config-json is required",
            )),
        }
    }

    /// State from `--state` or `--state-json`; empty when neither is given
    pub(crate) fn load_state(&self) -> Result<TapState> {
        match (&self.cli.state, &self.cli.state_json) {
            (_, Some(json)) => TapState::from_json(json),
            (Some(path), None) => TapState::from_file(path),
            (None, None) => Ok(TapState::new()),
        }
    }

    /// Print the catalog of every stream
    fn discover(&self) -> Result<()> {
        let catalog = Catalog::discover();
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &catalog).context("Failed to write catalog")?;
        writeln!(stdout)?;
        Ok(())
    }

    /// Sync every stream to stdout
    async fn sync(&self, config: &TapConfig, state: &TapState) -> Result<()> {
        let mut engine = SyncEngine::from_tap_config(config)?;
        let mut sink = SingerSink::stdout();

        let new_state = engine.run(&mut sink, state).await?;

        let stats = engine.stats();
        for (stream, count) in &stats.records {
            info!(stream, records = count, "Stream summary");
        }
        info!(
            records = stats.total_records(),
            pages = stats.pages_fetched,
            errors = stats.errors,
            duration_ms = stats.duration_ms,
            last_update = new_state.last_update,
            "Run finished"
        );
        Ok(())
    }
}
