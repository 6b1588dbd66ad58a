#![allow(dead_code)]

use docwire::{Registry, testing::RecordingHost};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh registry wired to a fresh recording host.
pub fn setup() -> (Registry, Arc<RecordingHost>) {
    init_tracing();
    let host = Arc::new(RecordingHost::new());
    (Registry::new(host.clone()), host)
}
