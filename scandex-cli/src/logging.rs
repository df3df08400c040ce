//! Logging initialization for the scandex CLI.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `ScandexConfig`. Logs go to stderr; stdout carries messages and the
//! run summary only.
//!
//! The configuration decides the log format, so it is loaded under a
//! short-lived [`bootstrap_subscriber`] first. Warnings about ignored
//! `SCANDEX_*` overrides are emitted there.

use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use scandex_core::config::GeneralConfig;

/// Level priority: `level_override` (CLI flag), then `RUST_LOG`, then `fallback`.
fn level_filter(level_override: Option<&str>, fallback: &str) -> EnvFilter {
    match level_override {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    }
}

/// Subscriber active while the configuration is being loaded.
///
/// Compact stderr output at the default `[general]` level, unless the CLI
/// flag or `RUST_LOG` say otherwise. Use with
/// [`tracing::subscriber::with_default`].
pub fn bootstrap_subscriber(level_override: Option<&str>) -> impl Subscriber + Send + Sync + use<> {
    let fallback = GeneralConfig::default().log_level;
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(level_filter(level_override, &fallback))
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable output
pub fn init_tracing(config: &GeneralConfig, level_override: Option<&str>) -> Result<()> {
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format.as_str() {
        "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        "pretty" => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            ));
        }
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(level_filter(level_override, &config.log_level))
        .try_init()
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to initialize {} tracing subscriber: {}",
                config.log_format,
                e
            )
        })
}
