//! Configuration management: `scandex.toml` parsing and runtime settings
//!
//! [`ScandexConfig`] holds every section of the configuration file.
//!
//! # Loading priority
//! 1. CLI arguments (highest)
//! 2. Environment variables (`SCANDEX_INDEX_OUTPUT_FILE=manifest.json` form)
//! 3. Config file (`scandex.toml`)
//! 4. Defaults (`Default` impls)
//!
//! # Example
//! ```no_run
//! # fn example() -> Result<(), scandex_core::error::ScandexError> {
//! use scandex_core::config::ScandexConfig;
//!
//! // Load from file and apply environment overrides
//! let config = ScandexConfig::load("scandex.toml")?;
//!
//! // Parse directly from a TOML string
//! let config = ScandexConfig::parse("[index]\nsort_entries = true")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ScandexError};

/// Default substring identifying the flesh image of a scan.
pub const DEFAULT_FLESH_PATTERN: &str = "flesh.tif";

/// Default name of the index file written into the root directory.
pub const DEFAULT_OUTPUT_FILE: &str = "index.json";

/// Default sidecar size limit in bytes.
pub const DEFAULT_MAX_SIDECAR_SIZE: usize = 10 * 1024 * 1024; // 10 MB

/// Default spaces per indentation level of the written index.
pub const DEFAULT_INDENT: usize = 4;

/// Largest accepted `max_sidecar_size`.
pub const MAX_SIDECAR_SIZE_LIMIT: usize = 100 * 1024 * 1024; // 100 MB

/// Largest accepted `indent`.
pub const MAX_INDENT: usize = 16;

/// `true` when `name` names a file directly inside a directory: non-empty,
/// no path separators, not `.` or `..`.
pub fn is_plain_file_name(name: &str) -> bool {
    !(name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']))
}

/// scandex configuration
///
/// Top-level structure of `scandex.toml`. Each crate reads only its section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScandexConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Indexer settings
    #[serde(default)]
    pub index: IndexConfig,
}

impl ScandexConfig {
    /// Loads the config from a TOML file, applies environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScandexError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Builds the effective config when no file was requested:
    /// defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ScandexError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads the config from a TOML file (no environment overrides).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScandexError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScandexError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ScandexError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ScandexError> {
        toml::from_str(toml_str).map_err(|e| {
            ScandexError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Overrides settings from environment variables.
    ///
    /// Naming rule: `SCANDEX_{SECTION}_{FIELD}`, e.g. `SCANDEX_INDEX_SORT_ENTRIES=true`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SCANDEX_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SCANDEX_GENERAL_LOG_FORMAT");

        // Index
        override_string(
            &mut self.index.flesh_pattern,
            "SCANDEX_INDEX_FLESH_PATTERN",
        );
        override_string(&mut self.index.output_file, "SCANDEX_INDEX_OUTPUT_FILE");
        override_policy(&mut self.index.missing_flesh, "SCANDEX_INDEX_MISSING_FLESH");
        override_bool(&mut self.index.sort_entries, "SCANDEX_INDEX_SORT_ENTRIES");
        override_usize(
            &mut self.index.max_sidecar_size,
            "SCANDEX_INDEX_MAX_SIDECAR_SIZE",
        );
        override_usize(&mut self.index.indent, "SCANDEX_INDEX_INDENT");
    }

    /// Validates every setting.
    pub fn validate(&self) -> Result<(), ScandexError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.index.flesh_pattern.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "index.flesh_pattern".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        // The index always lands directly inside the root directory.
        let output_file = self.index.output_file.as_str();
        if !is_plain_file_name(output_file) {
            return Err(ConfigError::InvalidValue {
                field: "index.output_file".to_owned(),
                reason: format!("'{output_file}' must be a plain file name"),
            }
            .into());
        }

        if self.index.max_sidecar_size == 0 || self.index.max_sidecar_size > MAX_SIDECAR_SIZE_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "index.max_sidecar_size".to_owned(),
                reason: format!("must be 1-{MAX_SIDECAR_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.index.indent == 0 || self.index.indent > MAX_INDENT {
            return Err(ConfigError::InvalidValue {
                field: "index.indent".to_owned(),
                reason: format!("must be 1-{MAX_INDENT}"),
            }
            .into());
        }

        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log format (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// What to do with a scan directory that has no flesh file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFleshPolicy {
    /// Abort the whole run; no index is written.
    #[default]
    Abort,
    /// Log the scan, leave it out of the index and continue.
    Skip,
}

impl MissingFleshPolicy {
    /// Case-insensitive parse of `abort` / `skip`.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Some(Self::Abort),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for MissingFleshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Indexer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Substring that identifies the flesh image inside a scan directory
    pub flesh_pattern: String,
    /// Index file name, created inside the root directory
    pub output_file: String,
    /// Handling of scan directories without a flesh file
    pub missing_flesh: MissingFleshPolicy,
    /// Sort scan directories and their entries by name for reproducible output
    pub sort_entries: bool,
    /// Sidecar files larger than this (bytes) are treated as having no parameters
    pub max_sidecar_size: usize,
    /// Number of spaces per indentation level in the written index
    pub indent: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            flesh_pattern: DEFAULT_FLESH_PATTERN.to_owned(),
            output_file: DEFAULT_OUTPUT_FILE.to_owned(),
            missing_flesh: MissingFleshPolicy::Abort,
            sort_entries: false,
            max_sidecar_size: DEFAULT_MAX_SIDECAR_SIZE,
            indent: DEFAULT_INDENT,
        }
    }
}

// --- environment override helpers ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_policy(target: &mut MissingFleshPolicy, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match MissingFleshPolicy::from_str_loose(&val) {
            Some(parsed) => *target = parsed,
            None => warn!(
                env_key,
                value = val.as_str(),
                "expected 'abort' or 'skip' in env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn plain_file_name_check() {
        assert!(is_plain_file_name("index.json"));
        assert!(is_plain_file_name(".index.json"));
        for name in ["", ".", "..", "a/index.json", "a\\index.json"] {
            assert!(!is_plain_file_name(name), "'{name}' is not a plain name");
        }
    }

    #[test]
    fn default_config_has_sane_values() {
        let config = ScandexConfig::default();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.index.flesh_pattern, "flesh.tif");
        assert_eq!(config.index.output_file, "index.json");
        assert_eq!(config.index.missing_flesh, MissingFleshPolicy::Abort);
        assert!(!config.index.sort_entries);
        assert_eq!(config.index.indent, 4);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = ScandexConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = ScandexConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.index.output_file, "index.json");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[index]
missing_flesh = "skip"
sort_entries = true
"#;
        let config = ScandexConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format keeps its default
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.index.missing_flesh, MissingFleshPolicy::Skip);
        assert!(config.index.sort_entries);
        assert_eq!(config.index.flesh_pattern, "flesh.tif");
    }

    #[test]
    fn from_str_invalid_policy_returns_error() {
        let result = ScandexConfig::parse("[index]\nmissing_flesh = \"retry\"\n");
        assert!(matches!(
            result,
            Err(ScandexError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = ScandexConfig::parse("[index\nindent = 2");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = ScandexConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = ScandexConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.log_format"));
    }

    #[test]
    fn validate_rejects_empty_flesh_pattern() {
        let mut config = ScandexConfig::default();
        config.index.flesh_pattern.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("index.flesh_pattern"));
    }

    #[test]
    fn validate_rejects_output_file_with_separator() {
        for bad in ["", "..", "out/index.json", "..\\index.json"] {
            let mut config = ScandexConfig::default();
            config.index.output_file = bad.to_owned();
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains("index.output_file"),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_out_of_range_numbers() {
        let mut config = ScandexConfig::default();
        config.index.max_sidecar_size = 0;
        assert!(config.validate().is_err());

        let mut config = ScandexConfig::default();
        config.index.max_sidecar_size = MAX_SIDECAR_SIZE_LIMIT + 1;
        assert!(config.validate().is_err());

        let mut config = ScandexConfig::default();
        config.index.indent = 0;
        assert!(config.validate().is_err());

        let mut config = ScandexConfig::default();
        config.index.indent = MAX_INDENT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn policy_parses_loosely() {
        assert_eq!(
            MissingFleshPolicy::from_str_loose(" SKIP "),
            Some(MissingFleshPolicy::Skip)
        );
        assert_eq!(
            MissingFleshPolicy::from_str_loose("Abort"),
            Some(MissingFleshPolicy::Abort)
        );
        assert_eq!(MissingFleshPolicy::from_str_loose("ignore"), None);
        assert_eq!(MissingFleshPolicy::Skip.to_string(), "skip");
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: env-mutating tests are serialized with #[serial].
        unsafe { std::env::set_var("TEST_SCANDEX_STR", "overridden") };
        override_string(&mut val, "TEST_SCANDEX_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_SCANDEX_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = false;
        // SAFETY: env-mutating tests are serialized with #[serial].
        unsafe { std::env::set_var("TEST_SCANDEX_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_SCANDEX_BOOL_BAD");
        assert!(!val);
        unsafe { std::env::remove_var("TEST_SCANDEX_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_usize_valid() {
        let mut val = 4;
        // SAFETY: env-mutating tests are serialized with #[serial].
        unsafe { std::env::set_var("TEST_SCANDEX_USIZE", "2") };
        override_usize(&mut val, "TEST_SCANDEX_USIZE");
        assert_eq!(val, 2);
        unsafe { std::env::remove_var("TEST_SCANDEX_USIZE") };
    }

    #[test]
    #[serial]
    fn env_override_policy_invalid_keeps_original() {
        let mut val = MissingFleshPolicy::Abort;
        // SAFETY: env-mutating tests are serialized with #[serial].
        unsafe { std::env::set_var("TEST_SCANDEX_POLICY", "maybe") };
        override_policy(&mut val, "TEST_SCANDEX_POLICY");
        assert_eq!(val, MissingFleshPolicy::Abort);
        unsafe { std::env::set_var("TEST_SCANDEX_POLICY", "skip") };
        override_policy(&mut val, "TEST_SCANDEX_POLICY");
        assert_eq!(val, MissingFleshPolicy::Skip);
        unsafe { std::env::remove_var("TEST_SCANDEX_POLICY") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_SCANDEX_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let mut config = ScandexConfig::default();
        config.index.missing_flesh = MissingFleshPolicy::Skip;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ScandexConfig::parse(&toml_str).unwrap();
        assert_eq!(parsed.index.missing_flesh, MissingFleshPolicy::Skip);
        assert_eq!(config.index.flesh_pattern, parsed.index.flesh_pattern);
    }

    #[test]
    fn from_file_not_found() {
        let result = ScandexConfig::from_file("/nonexistent/path/scandex.toml");
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ScandexError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
