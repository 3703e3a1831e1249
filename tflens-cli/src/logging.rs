//! Logging initialization for tflens.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `TflensConfig`. Supports JSON structured logging and
//! human-readable pretty format. Everything goes to stderr so that
//! stdout can carry the sections array.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tflens_core::config::{GeneralConfig, TflensConfig};

use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output (default)
pub fn init_tracing(config: &GeneralConfig) -> Result<(), CliError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    CliError::Command(format!(
                        "failed to initialize JSON tracing subscriber: {}",
                        e
                    ))
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    CliError::Command(format!(
                        "failed to initialize pretty tracing subscriber: {}",
                        e
                    ))
                })?;
        }
        _ => {
            return Err(CliError::Config(format!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            )));
        }
    }

    Ok(())
}

/// Apply the `--log-level` override, then install the subscriber.
///
/// An overridden level is validated before anything is installed.
pub fn init_for_command(
    config: &mut TflensConfig,
    log_level: Option<String>,
) -> Result<(), CliError> {
    if let Some(level) = log_level {
        config.general.log_level = level;
        config.validate()?;
    }
    init_tracing(&config.general)?;
    tflens_core::metrics::describe_all();
    Ok(())
}
