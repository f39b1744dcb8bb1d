//! Diagnostic tracing for the `kingroad` CLI.
//!
//! Store events (route ids, evictions, persistence failures) go through
//! `tracing` and are filtered by `RUST_LOG`. Route toasts are separate: the CLI
//! prints them with `StderrNotifier` whatever the filter says, and the UI
//! server forwards them to SSE clients through its `BroadcastNotifier` after
//! setting up its own subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a compact stderr subscriber filtered by `RUST_LOG`.
///
/// ```bash
/// RUST_LOG=kingroad::store=debug kingroad start "Salvador"
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter_from_env())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
