//! Error types shared by every scandex crate.

/// Top-level scandex error.
#[derive(Debug, thiserror::Error)]
pub enum ScandexError {
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file does not exist
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// The config file is not valid TOML for [`ScandexConfig`](crate::config::ScandexConfig)
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A field holds a value outside its allowed set or range
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
