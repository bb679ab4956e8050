//! Native logging setup for hosts that embed the session outside a browser

use tracing_subscriber::{fmt, EnvFilter};

const LOG_JSON_ENV: &str = "WALLETLINK_LOG_JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `WALLETLINK_LOG_JSON=1` selects JSON lines
    pub fn from_env() -> Self {
        match std::env::var(LOG_JSON_ENV) {
            Ok(value) if value == "1" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_logging() {
    init_logging_with("walletlink=info", LogFormat::from_env());
}

/// Install the global subscriber. `RUST_LOG` wins over `default_directive`.
/// A second call is a no-op.
pub fn init_logging_with(default_directive: &str, format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
