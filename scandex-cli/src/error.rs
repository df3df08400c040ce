//! CLI-specific error types and exit code mapping

use scandex_core::error::ScandexError;
use scandex_indexer::IndexerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A scan directory has no flesh file and the policy is to abort.
    #[error("structural error: {0}")]
    MissingFlesh(String),

    /// Listing the root or a scan directory, or writing the index, failed.
    #[error("filesystem error: {0}")]
    Filesystem(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success, or a usage message was printed   |
    /// | 1    | Serialisation error                       |
    /// | 2    | Configuration error                       |
    /// | 3    | Scan directory without a flesh file       |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::MissingFlesh(_) => 3,
            Self::Filesystem(_) | Self::Io(_) => 10,
            Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<IndexerError> for CliError {
    fn from(e: IndexerError) -> Self {
        match e {
            IndexerError::MissingFlesh { .. } => Self::MissingFlesh(e.to_string()),
            IndexerError::Io { .. } => Self::Filesystem(e.to_string()),
            IndexerError::Serialize(inner) => Self::JsonSerialize(inner),
            IndexerError::Config { .. } => Self::Config(e.to_string()),
        }
    }
}

impl From<ScandexError> for CliError {
    fn from(e: ScandexError) -> Self {
        match e {
            ScandexError::Config(inner) => Self::Config(inner.to_string()),
            ScandexError::Io(inner) => Self::Io(inner),
        }
    }
}
