//! Fallback orchestration tests through the full relay

use crate::helpers::*;
use crate::mock_providers::MockProvider;
use llm_provider_relay::{CapabilityRequest, Provider, RelayError};
use serde_json::json;
use std::sync::Arc;

fn request() -> CapabilityRequest {
    CapabilityRequest::new(CAP, json!({"prompt": "integration"}))
}

#[tokio::test]
async fn test_fallback_masks_primary_outage() {
    init_tracing();
    let primary = MockProvider::new("primary");
    primary.set_fail_execute(true);
    let secondary = MockProvider::new("secondary");
    let relay = relay_with(&[Arc::clone(&primary), Arc::clone(&secondary)]).await;

    let response = relay
        .execute(CAP, &request(), None)
        .await
        .expect("secondary absorbs the request");

    assert_eq!(response.provider, "secondary");
    assert_eq!(primary.execute_count(), 1);
    assert_eq!(secondary.execute_count(), 1);
}

#[tokio::test]
async fn test_first_success_short_circuits() {
    init_tracing();
    let primary = MockProvider::new("primary");
    let secondary = MockProvider::new("secondary");
    let relay = relay_with(&[Arc::clone(&primary), Arc::clone(&secondary)]).await;

    let response = relay.execute(CAP, &request(), None).await.expect("primary succeeds");

    assert_eq!(response.provider, "primary");
    assert_eq!(secondary.execute_count(), 0);
}

#[tokio::test]
async fn test_exhausted_chain_reports_every_attempt() {
    init_tracing();
    let a = MockProvider::new("alpha");
    let b = MockProvider::new("beta");
    a.set_fail_execute(true);
    b.set_fail_execute(true);
    let relay = relay_with(&[Arc::clone(&a), Arc::clone(&b)]).await;

    let error = relay
        .execute(CAP, &request(), None)
        .await
        .expect_err("no provider can satisfy the request");

    match error {
        RelayError::AllProvidersUnavailable { capability, attempts } => {
            assert_eq!(capability, CAP);
            let order: Vec<&str> = attempts.iter().map(|a| a.provider.as_str()).collect();
            assert_eq!(order, vec!["alpha", "beta"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_preferred_provider_jumps_the_queue() {
    init_tracing();
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    let relay = relay_with(&[Arc::clone(&primary), Arc::clone(&fallback)]).await;

    let response = relay
        .execute(CAP, &request(), Some("fallback"))
        .await
        .expect("preferred provider succeeds");

    assert_eq!(response.provider, "fallback");
    assert_eq!(primary.execute_count(), 0);
}

#[tokio::test]
async fn test_unknown_preferred_falls_back_to_priority_order() {
    init_tracing();
    let primary = MockProvider::new("primary");
    let relay = relay_with(&[Arc::clone(&primary)]).await;

    let response = relay
        .execute(CAP, &request(), Some("ghost"))
        .await
        .expect("chain still runs");

    assert_eq!(response.provider, "primary");
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_and_falls_back() {
    init_tracing();
    let slow = MockProvider::new("slow");
    slow.set_execute_delay(std::time::Duration::from_secs(60));
    let fast = MockProvider::new("fast");
    let relay = relay_with(&[Arc::clone(&slow), Arc::clone(&fast)]).await;

    let response = relay
        .execute(CAP, &request(), None)
        .await
        .expect("fast provider absorbs the request");

    assert_eq!(response.provider, "fast");
    // The timed-out attempt still counts against the slow provider.
    let metrics = slow.metrics();
    assert_eq!(metrics.total_calls, 1);
    assert!((metrics.error_rate - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_every_attempt_feeds_metrics() {
    init_tracing();
    let failing = MockProvider::new("failing");
    failing.set_fail_execute(true);
    let working = MockProvider::new("working");
    let relay = relay_with(&[Arc::clone(&failing), Arc::clone(&working)]).await;

    relay.execute(CAP, &request(), None).await.expect("succeeds via fallback");

    let failing_metrics = failing.metrics();
    assert_eq!(failing_metrics.total_calls, 1);
    assert!((failing_metrics.error_rate - 1.0).abs() < f64::EPSILON);
    assert!(failing_metrics.last_used.is_some());

    let working_metrics = working.metrics();
    assert_eq!(working_metrics.total_calls, 1);
    assert!(working_metrics.error_rate.abs() < f64::EPSILON);
    assert_eq!(working_metrics.total_tokens, 42);
}

#[tokio::test]
async fn test_probe_reports_roundtrip_and_missing_provider() {
    init_tracing();
    let provider = MockProvider::new("probe-me");
    let relay = relay_with(&[Arc::clone(&provider)]).await;

    let report = relay.probe_provider(CAP, "probe-me").await;
    assert!(report.success);
    assert!(report.response.is_some());

    let missing = relay.probe_provider(CAP, "ghost").await;
    assert!(!missing.success);
    assert!(missing.error.is_some());
}
