//! Tracing subscriber setup.
//!
//! Logs always go to stderr so stdout carries only command output.
//! `RUST_LOG` overrides the configured filter level.

use podium_client::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. With `quiet` only errors are shown,
/// unless `RUST_LOG` says otherwise.
pub(crate) fn init_logging(format: LogFormat, level: &str, quiet: bool) {
    let level = if quiet { "error" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Human => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
    }
}
