// ABOUTME: Test support utilities.
// ABOUTME: Scripted prober, fake CLI binaries and a fake engine socket.

use std::sync::Once;

// Each test binary only uses some of these helpers.
#[allow(dead_code)]
pub mod fake_bin;
#[allow(dead_code)]
pub mod fake_engine;
#[allow(dead_code)]
pub mod fake_prober;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("hatch=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
