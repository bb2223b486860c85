//! Tracing setup
//!
//! Filter comes from `RUST_LOG`, falling back to `info`.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber. Returns false if one was already set,
/// so calling it twice (tests, embedding hosts) is harmless.
pub fn init_tracing() -> bool {
    init_tracing_with(DEFAULT_FILTER)
}

pub fn init_tracing_with(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
