//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{Parser, ValueEnum};

/// scandex -- index a directory of scans into a single JSON manifest.
///
/// Each immediate subdirectory of ROOT is one scan. Its `flesh.tif` image and
/// experiment files (with optional same-name `.json` parameter sidecars) are
/// written to `ROOT/index.json`.
#[derive(Parser, Debug)]
#[command(name = "scandex", version, about, long_about = None)]
pub struct Cli {
    /// Root directory holding one subdirectory per scan.
    ///
    /// Exactly one is expected; any other count prints a usage message.
    /// Empty and dash-prefixed values are taken as paths and checked by the
    /// index command. Short options must come before ROOT.
    #[arg(
        value_name = "ROOT",
        allow_hyphen_values = true,
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    pub roots: Vec<PathBuf>,

    /// Path to a scandex.toml configuration file (defaults + env overrides when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level.
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// Format of the run summary printed after indexing.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Leave scans without a flesh file out of the index instead of aborting.
    #[arg(long)]
    pub skip_missing_flesh: bool,

    /// Sort scans and their entries by name for reproducible output.
    #[arg(long)]
    pub sorted: bool,

    /// Print the index to stdout instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}
