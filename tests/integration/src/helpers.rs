//! Test helper utilities for integration tests

use crate::mock_providers::MockProvider;
use llm_provider_relay::{Provider, ProviderConfig, Relay, RelayConfig};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Capability namespace used across the test suite
pub const CAP: &str = "text-generation";

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Relay configuration with tight timeouts suited to tests
pub fn fast_config() -> RelayConfig {
    let mut config = RelayConfig::new().with_call_timeout(Duration::from_millis(250));
    config.health.interval = Duration::from_millis(50);
    config.health.check_timeout = Duration::from_millis(100);
    config
}

/// Build a relay and register the given providers with descending priorities.
///
/// The first provider gets the highest priority, so it is the first
/// candidate in the fallback chain.
pub async fn relay_with(providers: &[Arc<MockProvider>]) -> Relay {
    let relay = Relay::builder().config(fast_config()).build();
    let top = providers.len() as i32 * 10;
    for (index, provider) in providers.iter().enumerate() {
        let priority = top - (index as i32 * 10);
        let config = ProviderConfig::new(provider.name(), provider.version())
            .with_priority(priority);
        relay
            .register_provider(CAP, Arc::clone(provider) as Arc<dyn Provider>, config)
            .await
            .expect("mock provider registers");
    }
    relay
}
