//! scandex -- index a directory of scans into `<root>/index.json`.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;

use scandex_core::config::ScandexConfig;

use crate::cli::Cli;
use crate::commands::index::{self, IndexArgs};
use crate::error::CliError;
use crate::output::OutputWriter;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = tracing::subscriber::with_default(
        logging::bootstrap_subscriber(cli.log_level.as_deref()),
        || load_config(cli.config.as_deref()),
    )?;

    logging::init_tracing(&config.general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(
        config = ?cli.config,
        output_file = %config.index.output_file,
        "scandex starting"
    );

    let writer = OutputWriter::new(cli.format);
    index::execute(IndexArgs::from(&cli), &config, &writer)
}

/// An explicitly requested config file must exist; without one the defaults
/// plus environment overrides are used.
fn load_config(path: Option<&Path>) -> Result<ScandexConfig, CliError> {
    let config = match path {
        Some(path) => ScandexConfig::load(path)?,
        None => ScandexConfig::from_env()?,
    };
    Ok(config)
}
