//! MSU tree training integration tests.
//!
//! Focused on behavior and invariants of whole training runs.

mod nominal;
mod numeric;

use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("msutree=trace"))
        .with_test_writer()
        .try_init();
}
