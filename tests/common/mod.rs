use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// route tracing output through the test harness, filtered by RUST_LOG
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// the worst case height of an avl tree holding len elements
#[allow(dead_code)]
pub fn avl_bound(len: usize) -> f64 {
    1.4405 * ((len + 2) as f64).log2() - 0.3277
}
