//! Shared building blocks for the scandex workspace.
//!
//! - [`error`]: top-level error taxonomy (`ScandexError`, `ConfigError`)
//! - [`config`]: `scandex.toml` loading, environment overrides and validation

pub mod config;
pub mod error;

pub use config::{GeneralConfig, IndexConfig, MissingFleshPolicy, ScandexConfig};
pub use error::{ConfigError, ScandexError};
