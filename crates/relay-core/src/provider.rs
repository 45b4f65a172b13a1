//! The provider contract.
//!
//! Every pluggable backend implements [`Provider`]. How a provider talks to
//! its remote service is opaque to the relay; the contract only requires a
//! unit of work, a cheap liveness probe, and a metrics recorder the
//! orchestrator can feed after each attempt.

use crate::error::RelayResult;
use crate::metrics::{MetricsRecorder, ProviderMetrics};
use crate::request::{CapabilityRequest, CapabilityResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Tri-state liveness classification derived from health probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Never successfully probed; excluded from best-provider selection
    Unknown,
    /// Last probe succeeded
    Healthy,
    /// Last probe failed or raised
    Unhealthy,
}

impl HealthState {
    /// Whether this state qualifies for best-provider selection
    #[must_use]
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Static feature flags a provider advertises.
///
/// The orchestrator may consult these to route capability-specific
/// requests; they never change after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Provider can stream partial output
    pub supports_streaming: bool,
    /// Provider can serve multi-turn chat completion
    pub supports_chat: bool,
    /// Provider can produce embeddings
    pub supports_embeddings: bool,
}

impl ProviderCapabilities {
    /// Text-only generation, no extras
    #[must_use]
    pub fn text_only() -> Self {
        Self::default()
    }

    /// Enable streaming
    #[must_use]
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.supports_streaming = streaming;
        self
    }

    /// Enable chat completion
    #[must_use]
    pub fn with_chat(mut self, chat: bool) -> Self {
        self.supports_chat = chat;
        self
    }

    /// Enable embeddings
    #[must_use]
    pub fn with_embeddings(mut self, embeddings: bool) -> Self {
        self.supports_embeddings = embeddings;
        self
    }
}

/// Contract implemented by every pluggable provider.
///
/// Implementations must be cheap to share (`Arc<dyn Provider>`); a single
/// instance may be registered under several capability namespaces at once.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name, unique within a capability namespace
    fn name(&self) -> &str;

    /// Implementation version string
    fn version(&self) -> &str;

    /// Static feature flags
    fn capabilities(&self) -> ProviderCapabilities;

    /// The metrics recorder owned by this instance.
    ///
    /// Shared bookkeeping lives in the recorder rather than in each
    /// implementation; the orchestrator feeds it after every attempt.
    fn recorder(&self) -> &MetricsRecorder;

    /// One-time setup. A provider that fails here must not be registered.
    async fn initialize(&self) -> RelayResult<()> {
        Ok(())
    }

    /// Cheap liveness probe.
    ///
    /// Expected failure modes return `Ok(false)`; unexpected ones may
    /// return `Err`, which the health monitor treats as unhealthy.
    async fn health_check(&self) -> RelayResult<bool>;

    /// Execute one unit of work for a capability
    async fn execute(&self, request: &CapabilityRequest) -> RelayResult<CapabilityResponse>;

    /// Read-only snapshot of this instance's rolling statistics
    fn metrics(&self) -> ProviderMetrics {
        self.recorder().snapshot()
    }
}
