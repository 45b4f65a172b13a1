//! End-to-end integration tests
//!
//! Full lifecycle flows through the public relay surface: registration,
//! health monitoring, request routing, introspection, and shutdown.

use crate::helpers::*;
use crate::mock_providers::MockProvider;
use llm_provider_relay::{
    CapabilityRequest, HealthState, Provider, ProviderConfig, Relay, RelayError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_e2e_lifecycle() {
    init_tracing();
    let openai = MockProvider::new("openai");
    let anthropic = MockProvider::new("anthropic");
    let relay = relay_with(&[Arc::clone(&openai), Arc::clone(&anthropic)]).await;

    relay.start().await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    // Both backends passed the initial sweep.
    let infos = relay.providers_info().await;
    assert_eq!(infos.len(), 2);
    assert!(infos.iter().all(|i| i.health == HealthState::Healthy));

    // Normal traffic goes to the highest-priority backend.
    let request = CapabilityRequest::new(CAP, json!({"prompt": "hello"}));
    let response = relay.execute(CAP, &request, None).await.expect("routed");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.request_id, request.request_id);
    assert_eq!(response.tokens_used, 42);

    // The primary degrades; traffic shifts without client-visible failures.
    openai.set_fail_execute(true);
    openai.set_healthy(false);
    let response = relay.execute(CAP, &request, None).await.expect("fell back");
    assert_eq!(response.provider, "anthropic");

    relay.shutdown().await;
}

#[tokio::test]
async fn test_e2e_failed_initialization_keeps_relay_usable() {
    init_tracing();
    let broken = MockProvider::new("broken");
    broken.set_fail_init(true);
    let working = MockProvider::new("working");

    let relay = Relay::builder().config(fast_config()).build();
    let error = relay
        .register_provider(CAP, Arc::clone(&broken) as Arc<dyn Provider>, ProviderConfig::new("broken", "1.0.0"))
        .await
        .expect_err("initialization fails");
    assert!(matches!(error, RelayError::Initialization { .. }));

    relay
        .register_provider(CAP, Arc::clone(&working) as Arc<dyn Provider>, ProviderConfig::new("working", "1.0.0"))
        .await
        .expect("registers");

    let request = CapabilityRequest::new(CAP, json!({"prompt": "hello"}));
    let response = relay.execute(CAP, &request, None).await.expect("routed");
    assert_eq!(response.provider, "working");
    assert_eq!(relay.registry().len().await, 1);
}

#[tokio::test]
async fn test_e2e_introspection_surface() {
    init_tracing();
    let alpha = MockProvider::new("alpha");
    let beta = MockProvider::new("beta");
    let relay = relay_with(&[Arc::clone(&alpha), Arc::clone(&beta)]).await;

    let request = CapabilityRequest::new(CAP, json!({"prompt": "hello"}));
    relay.execute(CAP, &request, None).await.expect("routed");

    let available = relay.available_providers(Some(CAP)).await;
    assert_eq!(available.len(), 2);
    let alpha_entry = available
        .iter()
        .find(|p| p.name == "alpha")
        .expect("alpha listed");
    assert_eq!(alpha_entry.metrics.total_calls, 1);
    assert!(alpha_entry.enabled);

    // Introspection output serializes for operator tooling.
    let infos = relay.providers_info().await;
    let rendered = serde_json::to_string(&infos).expect("serializable");
    assert!(rendered.contains("text-generation/alpha"));

    assert!(relay.available_providers(Some("image-generation")).await.is_empty());
}

#[tokio::test]
async fn test_e2e_unregister_removes_from_rotation() {
    init_tracing();
    let primary = MockProvider::new("primary");
    let secondary = MockProvider::new("secondary");
    let relay = relay_with(&[Arc::clone(&primary), Arc::clone(&secondary)]).await;

    assert!(relay.unregister_provider(CAP, "primary").await);
    assert!(!relay.unregister_provider(CAP, "primary").await);

    let request = CapabilityRequest::new(CAP, json!({"prompt": "hello"}));
    let response = relay.execute(CAP, &request, None).await.expect("routed");
    assert_eq!(response.provider, "secondary");
    assert_eq!(primary.execute_count(), 0);
}
