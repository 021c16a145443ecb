//! Tests for tracing initialization.

use pairank_core::tracing::init_tracing;

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(poll = "videos", "tracing initialized twice");
}
