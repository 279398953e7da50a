pub mod config;

pub use config::{LogFormat, LoggingConfig, LOG_ENV};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },
    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Builds the filter from [`LoggingConfig::filter_directive`].
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let directive = config.filter_directive();
    EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
        directive,
        reason: e.to_string(),
    })
}

/// Installs the global subscriber for an application embedding kankri.
///
/// The library itself only emits events; it never calls this.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(&config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.ansi))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(config.ansi))
            .try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    result.map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "logging initialized"
    );
    Ok(())
}

/// Test subscriber writing through the libtest capture. Safe to call from
/// every test; only the first call installs anything.
pub fn try_init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("kankri=trace"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}
