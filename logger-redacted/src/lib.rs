//! Logging for voice-driven clinical forms
//!
//! Dictated transcripts are PHI: a spoken "my age is 42, weight 90" is a
//! patient record fragment. This crate installs the tracing subscriber used
//! by every binary in the workspace and provides the [`TranscriptRedactor`]
//! that callers run transcripts through before handing them to a log macro.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig, TranscriptRedactor};
//!
//! # fn main() -> Result<(), logger_redacted::LoggerError> {
//! init_tracing(&LoggerConfig::from_env())?;
//!
//! let redactor = TranscriptRedactor::default();
//! tracing::info!(transcript = %redactor.redact("age 42"), "Transcript received");
//! // Output: transcript=age ***
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```bash
//! LOG_LEVEL=debug      # default level when RUST_LOG is unset
//! LOG_FORMAT=json      # pretty (default) or json
//! ```

pub mod redactor;
pub mod config;

pub use redactor::*;
pub use config::*;

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("Global tracing subscriber already initialized")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|_| LoggerError::InvalidFilter(config.log_level.clone()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_reported() {
        // Only reached when RUST_LOG is unset in the test environment
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggerConfig::default().with_level("voice_form=loud");
        match init_tracing(&config) {
            Err(LoggerError::InvalidFilter(level)) => assert_eq!(level, "voice_form=loud"),
            other => panic!("expected invalid filter, got {:?}", other),
        }
    }
}
