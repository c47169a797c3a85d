//! Tracing subscriber setup.
//!
//! The crate itself only emits `tracing` events; binaries and tests that want
//! to see them call [`init`] once.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Environment variable holding the filter directives, e.g. `multitarget=debug`.
pub const LOG_ENV: &str = "MULTITARGET_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The directives in the environment could not be parsed.
    #[error("Invalid {LOG_ENV} directives {directives:?}: {source}")]
    InvalidFilter {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Install a global fmt subscriber filtered by [`LOG_ENV`] (default `info`).
///
/// Subsequent calls are no-ops.
pub fn init() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let filter = env_filter(std::env::var(LOG_ENV).ok())?;
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = INSTALLED.set(());

    tracing::debug!("logging initialized");
    Ok(())
}

fn env_filter(directives: Option<String>) -> Result<EnvFilter, LoggingError> {
    match directives {
        Some(directives) => EnvFilter::try_new(&directives)
            .map_err(|source| LoggingError::InvalidFilter { directives, source }),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}
