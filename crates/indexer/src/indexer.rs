//! Indexer orchestrator
//!
//! [`Indexer`] ties enumeration, per-scan indexing and writing together:
//!
//! ```text
//! root --> list_scan_dirs --> index_scan_dir (per scan) --> IndexDocument --> <root>/index.json
//! ```
//!
//! Everything runs sequentially on the calling thread.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use scandex_core::config::MissingFleshPolicy;

use crate::config::IndexerConfig;
use crate::enumerate::list_scan_dirs;
use crate::error::IndexerError;
use crate::scan::{index_scan_dir, scan_name};
use crate::types::{IndexDocument, IndexSummary};

/// Builds and writes index documents.
#[derive(Debug, Clone)]
pub struct Indexer {
    config: IndexerConfig,
}

impl Indexer {
    /// Creates an indexer after validating `config`.
    pub fn new(config: IndexerConfig) -> Result<Self, IndexerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Path the index for `root` is written to.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.config.output_file)
    }

    /// Indexes every scan directory under `root` without writing anything.
    ///
    /// With [`MissingFleshPolicy::Abort`] the first scan without a flesh file
    /// fails the whole run. With [`MissingFleshPolicy::Skip`] it is left out
    /// and listed in [`IndexSummary::scans_skipped`].
    pub fn build_document(
        &self,
        root: &Path,
    ) -> Result<(IndexDocument, IndexSummary), IndexerError> {
        let scan_dirs = list_scan_dirs(root, self.config.sort_entries)?;
        info!(root = %root.display(), scans = scan_dirs.len(), "indexing scan directories");

        let mut scans = Vec::with_capacity(scan_dirs.len());
        let mut skipped = Vec::new();

        for scan_dir in &scan_dirs {
            match index_scan_dir(scan_dir, &self.config) {
                Ok(record) => scans.push(record),
                Err(err @ IndexerError::MissingFlesh { .. })
                    if self.config.missing_flesh == MissingFleshPolicy::Skip =>
                {
                    warn!(scan = %scan_dir.display(), error = %err, "skipping scan without flesh file");
                    skipped.push(scan_name(scan_dir));
                }
                Err(err) => return Err(err),
            }
        }

        let document = IndexDocument::new(scans);
        let summary = IndexSummary {
            root: root.to_path_buf(),
            output: None,
            scans_indexed: document.len(),
            scans_skipped: skipped,
            experiments: document.experiment_count(),
            experiments_with_parameters: document
                .scans
                .iter()
                .map(|s| s.parameterized_count())
                .sum(),
        };

        Ok((document, summary))
    }

    /// Indexes `root` and writes the document to `<root>/<output_file>`,
    /// overwriting any existing file. Nothing is written when indexing fails.
    pub fn run(&self, root: &Path) -> Result<IndexSummary, IndexerError> {
        let (document, mut summary) = self.build_document(root)?;

        let output = self.output_path(root);
        document.write_to(&output, self.config.indent)?;
        info!(
            output = %output.display(),
            scans = summary.scans_indexed,
            experiments = summary.experiments,
            "index written"
        );

        summary.output = Some(output);
        Ok(summary)
    }
}
