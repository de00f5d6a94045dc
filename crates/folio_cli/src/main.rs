//! Folio command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the SQLite-backed store.
//! - Dispatch one command per invocation and print its result.

mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use commands::Cli;
use folio_core::{init_logging, ConfigOverrides, CoreConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CoreConfig::resolve(ConfigOverrides {
        db_path: cli.db.clone(),
        log_level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
    })
    .map_err(|err| anyhow!(err))?;

    if let Some(log_dir) = config.log_dir.as_ref() {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(config.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }

    cli.command.execute(&config)
}
