//! # Telemetry
//!
//! Tracing subscriber setup for binaries and local tooling.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,stockroom=debug,sqlx=warn";

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (or [`DEFAULT_FILTER`]).
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
