//! Shared setup for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use redis_objects::MemoryTransport;

// =============================================================================
// Helper Functions
// =============================================================================

/// Install a test log writer (RUST_LOG=redis_objects=trace to see commands)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh in-process store
pub fn memory() -> Arc<MemoryTransport> {
    init_tracing();
    Arc::new(MemoryTransport::new())
}

/// Let spawned default-seeding tasks run on the current-thread test runtime
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
