//! Tracing integration for structured logging.
//!
//! The library only emits `tracing` events. Hosts that want to see them
//! either install their own subscriber or call [`init_logging`] once.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{PredictorError, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// Structured JSON output.
    Json,
}

/// Level name for a verbosity (0=error, 1=warn, 2=info, 3=debug, 4+=trace).
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber for this crate's events.
///
/// `RUST_LOG` overrides `verbosity` when set. Fails with
/// [`PredictorError::Logging`] if a global subscriber is already installed.
///
/// ```ignore
/// use swipe_predictor::logging::{init_logging, LogFormat};
///
/// init_logging(3, LogFormat::Json).unwrap();
/// ```
pub fn init_logging(verbosity: u8, format: LogFormat) -> Result<()> {
    let level = level_for(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swipe_predictor={}", level)));

    let installed = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(verbosity >= 3)
                    .with_line_number(verbosity >= 3),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| PredictorError::Logging {
        message: e.to_string(),
    })
}

/// Initialize logging for tests, ignoring "already installed".
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = init_logging(2, LogFormat::Text);
}
