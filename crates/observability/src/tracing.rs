//! Tracing/logging initialization.
//!
//! Logs go to stderr so they never interleave with operator prompts on
//! stdout. Filtering follows `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "RESTOCK_LOG_FORMAT";

/// Output encoding of log lines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable, compact single lines.
    Compact,
}

impl LogFormat {
    /// `compact` selects [`LogFormat::Compact`]; anything else is JSON.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("compact") {
            Self::Compact
        } else {
            Self::Json
        }
    }

    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}
