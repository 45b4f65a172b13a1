//! Capability request and response types.
//!
//! The relay is transport-agnostic: a request is an opaque JSON payload
//! addressed to a capability namespace, and a response is whatever the
//! selected provider produced, tagged with the provider that served it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A unit of work addressed to a capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRequest {
    /// Unique request id for tracing
    pub request_id: Uuid,
    /// Capability namespace this request targets (e.g. "text-generation")
    pub capability: String,
    /// Provider-interpretable payload
    pub payload: serde_json::Value,
    /// Opaque per-request metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CapabilityRequest {
    /// Create a request with a fresh id
    #[must_use]
    pub fn new(capability: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            capability: capability.into(),
            payload,
            metadata: HashMap::new(),
        }
    }

    /// A minimal synthetic request used for diagnostics probes
    #[must_use]
    pub fn synthetic(capability: impl Into<String>) -> Self {
        let mut request = Self::new(capability, serde_json::json!({ "input": "ping" }));
        request.metadata.insert(
            "synthetic".to_string(),
            serde_json::Value::Bool(true),
        );
        request
    }

    /// Attach a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whether this request is a diagnostics probe
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.metadata
            .get("synthetic")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

/// The result of a successful provider invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResponse {
    /// Id of the request this answers
    pub request_id: Uuid,
    /// Name of the provider that served the request
    pub provider: String,
    /// Provider output payload
    pub payload: serde_json::Value,
    /// Tokens consumed by the invocation, when the provider reports them
    pub tokens_used: u64,
}

impl CapabilityResponse {
    /// Create a response answering the given request
    #[must_use]
    pub fn new(
        request: &CapabilityRequest,
        provider: impl Into<String>,
        payload: serde_json::Value,
        tokens_used: u64,
    ) -> Self {
        Self {
            request_id: request.request_id,
            provider: provider.into(),
            payload,
            tokens_used,
        }
    }
}
