//! Indexer configuration
//!
//! [`IndexerConfig`] mirrors the `[index]` section of
//! [`IndexConfig`](scandex_core::config::IndexConfig) and is what the
//! [`Indexer`](crate::Indexer) actually runs with.
//!
//! # Example
//!
//! ```
//! use scandex_indexer::{IndexerConfig, IndexerConfigBuilder};
//!
//! let config = IndexerConfig::default();
//! config.validate().unwrap();
//!
//! let config = IndexerConfigBuilder::new()
//!     .sort_entries(true)
//!     .output_file("manifest.json")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.output_file, "manifest.json");
//! ```

use serde::{Deserialize, Serialize};

use scandex_core::config::{
    IndexConfig, MAX_INDENT, MAX_SIDECAR_SIZE_LIMIT, MissingFleshPolicy, is_plain_file_name,
};

use crate::error::IndexerError;

/// Indexer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Substring identifying the flesh image; matched against the full entry path
    pub flesh_pattern: String,
    /// Index file name inside the root directory
    pub output_file: String,
    /// Abort the run or skip the scan when no flesh file is found
    pub missing_flesh: MissingFleshPolicy,
    /// Sort scans and entries by name instead of keeping listing order
    pub sort_entries: bool,
    /// Largest sidecar (bytes) that is still parsed
    pub max_sidecar_size: usize,
    /// Spaces per indentation level in the written index
    pub indent: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self::from_core(&IndexConfig::default())
    }
}

impl IndexerConfig {
    /// Creates the indexer config from the core `[index]` section.
    pub fn from_core(core: &IndexConfig) -> Self {
        Self {
            flesh_pattern: core.flesh_pattern.clone(),
            output_file: core.output_file.clone(),
            missing_flesh: core.missing_flesh,
            sort_entries: core.sort_entries,
            max_sidecar_size: core.max_sidecar_size,
            indent: core.indent,
        }
    }

    /// Validates the settings.
    ///
    /// - `flesh_pattern`: non-empty
    /// - `output_file`: plain file name (no separators, not `.`/`..`)
    /// - `max_sidecar_size`: 1-[`MAX_SIDECAR_SIZE_LIMIT`]
    /// - `indent`: 1-[`MAX_INDENT`]
    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.flesh_pattern.is_empty() {
            return Err(IndexerError::Config {
                field: "flesh_pattern".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if !is_plain_file_name(&self.output_file) {
            return Err(IndexerError::Config {
                field: "output_file".to_owned(),
                reason: format!("'{}' must be a plain file name", self.output_file),
            });
        }

        if self.max_sidecar_size == 0 || self.max_sidecar_size > MAX_SIDECAR_SIZE_LIMIT {
            return Err(IndexerError::Config {
                field: "max_sidecar_size".to_owned(),
                reason: format!("must be 1-{MAX_SIDECAR_SIZE_LIMIT}"),
            });
        }

        if self.indent == 0 || self.indent > MAX_INDENT {
            return Err(IndexerError::Config {
                field: "indent".to_owned(),
                reason: format!("must be 1-{MAX_INDENT}"),
            });
        }

        Ok(())
    }
}

/// [`IndexerConfig`] builder; `build()` validates.
#[derive(Default)]
pub struct IndexerConfigBuilder {
    config: IndexerConfig,
}

impl IndexerConfigBuilder {
    /// Creates a builder holding the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing config.
    pub fn from_config(config: IndexerConfig) -> Self {
        Self { config }
    }

    pub fn flesh_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.flesh_pattern = pattern.into();
        self
    }

    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.config.output_file = name.into();
        self
    }

    pub fn missing_flesh(mut self, policy: MissingFleshPolicy) -> Self {
        self.config.missing_flesh = policy;
        self
    }

    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.config.sort_entries = sort;
        self
    }

    pub fn max_sidecar_size(mut self, size: usize) -> Self {
        self.config.max_sidecar_size = size;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.config.indent = indent;
        self
    }

    /// Validates and returns the config.
    pub fn build(self) -> Result<IndexerConfig, IndexerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
