//! Tracing subscriber setup for binaries, demos, and tests.
//!
//! The engine itself only emits `tracing` events. Hosts decide where they
//! go; [`init`] is the stock choice: a `fmt` subscriber filtered by
//! `RUST_LOG`, falling back to a default directive.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a global `fmt` subscriber.
///
/// Idempotent: if a subscriber is already installed (a second call, or a test
/// harness that set one up) this returns `false` and changes nothing.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}

/// [`init`] writing through the test harness's captured output.
pub fn init_for_tests() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}
