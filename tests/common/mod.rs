//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use page_engine::{BasePage, FakeSession, PageConfig};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_target(false)
        .try_init();
}

/// Tiers short enough that timeouts resolve in milliseconds.
pub fn quick_config() -> PageConfig {
    PageConfig::builder()
        .long_timeout(Duration::from_millis(300))
        .short_timeout(Duration::from_millis(80))
        .poll_interval(Duration::from_millis(10))
        .highlight_duration(Duration::from_millis(5))
        .build()
        .expect("valid test config")
}

/// An engine over `session` using [`quick_config`].
pub fn quick_page(session: &FakeSession) -> BasePage<'_, FakeSession> {
    BasePage::with_config(session, quick_config())
}
