//! Unified test logging initialization
//!
//! Integration tests cannot see `wgp-core`'s `#[cfg(test)]` bootstrap, so
//! they call this instead. Level precedence:
//!
//! 1. `TEST_LOG`
//! 2. `RUST_LOG`
//! 3. `"warn"`

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Idempotent and race-safe; never panics if a subscriber is already set.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
        tracing::debug!("test logging initialised");
    });
}
