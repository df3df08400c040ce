//! Index command handler: the default (and only) action of `scandex`.

use std::fmt;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::info;

use scandex_core::config::{MissingFleshPolicy, ScandexConfig};
use scandex_indexer::{IndexSummary, Indexer, IndexerConfig, IndexerConfigBuilder};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Arguments of one index run, taken from the parsed command line.
#[derive(Debug, Clone, Default)]
pub struct IndexArgs {
    pub roots: Vec<PathBuf>,
    pub skip_missing_flesh: bool,
    pub sorted: bool,
    pub dry_run: bool,
}

impl From<&Cli> for IndexArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            roots: cli.roots.clone(),
            skip_missing_flesh: cli.skip_missing_flesh,
            sorted: cli.sorted,
            dry_run: cli.dry_run,
        }
    }
}

/// Invocation problems that are reported with a message and a zero exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Number of root paths given, when it is not exactly one.
    ArgumentCount(usize),
    /// The root does not resolve to a directory.
    NotADirectory,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgumentCount(n) => write!(
                f,
                "The number of arguments = {n} is wrong. Script only accepts 1 argument (path to the root directory)."
            ),
            Self::NotADirectory => write!(f, "The provided file is not a directory."),
        }
    }
}

/// Checks the root arguments and resolves the single root to an absolute path.
///
/// An empty argument means the current directory. `.` and `..` components
/// are folded lexically; symlinks are not resolved.
pub fn resolve_root(roots: &[PathBuf]) -> Result<PathBuf, UsageError> {
    let [root] = roots else {
        return Err(UsageError::ArgumentCount(roots.len()));
    };

    let absolute = if root.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        std::path::absolute(root)
    }
    .map_err(|_| UsageError::NotADirectory)?;

    let root = normalize_lexically(&absolute);
    if !root.is_dir() {
        return Err(UsageError::NotADirectory);
    }
    Ok(root)
}

/// Drops `.` and folds `..` into its parent without touching the filesystem.
/// `..` at the root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Builds the indexer settings for this run: `[index]` config plus CLI flags.
pub fn indexer_config(args: &IndexArgs, config: &ScandexConfig) -> Result<IndexerConfig, CliError> {
    let mut builder = IndexerConfigBuilder::from_config(IndexerConfig::from_core(&config.index));
    if args.skip_missing_flesh {
        builder = builder.missing_flesh(MissingFleshPolicy::Skip);
    }
    if args.sorted {
        builder = builder.sort_entries(true);
    }
    Ok(builder.build()?)
}

/// Execute an index run.
///
/// Usage problems print their message to stdout and return `Ok(())`.
pub fn execute(
    args: IndexArgs,
    config: &ScandexConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let root = match resolve_root(&args.roots) {
        Ok(root) => root,
        Err(usage) => {
            println!("{usage}");
            return Ok(());
        }
    };

    let indexer = Indexer::new(indexer_config(&args, config)?)?;
    info!(
        root = %root.display(),
        policy = %indexer.config().missing_flesh,
        dry_run = args.dry_run,
        "starting index run"
    );

    if args.dry_run {
        let (document, summary) = indexer.build_document(&root)?;
        let json = document.to_json_string(indexer.config().indent)?;
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{json}")?;
        info!(
            scans = summary.scans_indexed,
            skipped = summary.scans_skipped.len(),
            "dry run finished, nothing written"
        );
        return Ok(());
    }

    let summary = indexer.run(&root)?;
    writer.render(&IndexReport(summary))?;
    Ok(())
}

/// Run summary as shown to the user.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct IndexReport(pub IndexSummary);

impl IndexReport {
    fn output(&self) -> Option<&Path> {
        self.0.output.as_deref()
    }
}

impl Render for IndexReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let s = &self.0;
        writeln!(
            w,
            "Indexed {} scan(s): {} experiment(s), {} with parameters",
            s.scans_indexed.to_string().bold(),
            s.experiments,
            s.experiments_with_parameters
        )?;

        if let Some(output) = self.output() {
            writeln!(w, "Index written to {}", output.display().to_string().green())?;
        }

        if !s.scans_skipped.is_empty() {
            writeln!(
                w,
                "{} {}",
                "Skipped (no flesh file):".yellow(),
                s.scans_skipped.join(", ")
            )?;
        }

        Ok(())
    }
}
