//! Console logging setup using `tracing-subscriber`.
//!
//! `RUST_LOG` decides the filter; without it everything at `info` and above
//! is shown.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Build the filter from a `RUST_LOG`-style directive string.
///
/// Invalid directives are skipped rather than failing startup.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Install the global subscriber, reading `RUST_LOG` from the environment.
pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();
}
