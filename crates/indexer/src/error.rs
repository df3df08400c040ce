//! Indexer error types
//!
//! [`IndexerError`] covers every failure the indexer can surface. Sidecar
//! problems never appear here: they are folded into
//! [`SidecarOutcome::Absent`](crate::sidecar::SidecarOutcome::Absent).
//!
//! The CLI maps each variant straight to its own error and exit code.

/// Indexer domain error
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// Listing a directory or writing the index failed
    #[error("io error: {path}: {source}")]
    Io {
        /// Path the operation was applied to
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A scan directory has no entry matching the flesh pattern
    #[error("no flesh file matching '{pattern}' in scan directory '{scan}'")]
    MissingFlesh {
        /// Scan directory path
        scan: String,
        /// Pattern that was searched for
        pattern: String,
    },

    /// The index document could not be serialized or parsed
    #[error("index serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid indexer configuration
    #[error("config error: {field}: {reason}")]
    Config {
        /// Config field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl IndexerError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
