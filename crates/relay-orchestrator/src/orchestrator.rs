//! Turning capability requests into successful provider invocations.
//!
//! The orchestrator asks the registry for candidates, attempts them one at
//! a time, and masks single-provider failures from the caller as long as an
//! alternative remains. The walk is strictly sequential: only one
//! successful response is needed, and racing providers would multiply cost
//! against the backing services. Every attempt feeds the provider's metrics
//! recorder, success or not.

use relay_core::{
    AttemptFailure, CapabilityRequest, CapabilityResponse, ProviderMetrics, RelayError,
    RelayResult,
};
use relay_core::{Provider, ProviderCapabilities};
use relay_registry::ProviderRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Budget for one provider invocation; exceeding it fails the attempt
    #[serde(with = "humantime_serde")]
    pub call_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl OrchestratorConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// Introspection record for one registered provider
#[derive(Debug, Clone, Serialize)]
pub struct AvailableProvider {
    /// Provider name
    pub name: String,
    /// Implementation version
    pub version: String,
    /// Capability namespace the entry is registered under
    pub capability: String,
    /// Static feature flags
    pub capabilities: ProviderCapabilities,
    /// Rolling usage statistics at snapshot time
    pub metrics: ProviderMetrics,
    /// Whether the provider participates in selection
    pub enabled: bool,
}

/// Outcome of a single-provider diagnostics probe.
///
/// Probes never fail outright; provider errors and timeouts are captured
/// in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Whether the synthetic request succeeded
    pub success: bool,
    /// Provider output on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<CapabilityResponse>,
    /// Rendered failure on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration of the attempt in milliseconds
    pub response_time_ms: u64,
}

/// The request-routing layer over a shared [`ProviderRegistry`]
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create an orchestrator over the given registry
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, config: OrchestratorConfig) -> Self {
        Self { registry, config }
    }

    /// Satisfy a capability request, falling back across providers.
    ///
    /// When `preferred` names a provider that is registered and enabled
    /// under `capability`, it is attempted first regardless of its health
    /// status; the explicit preference overrides health filtering for that
    /// first attempt only. The remaining candidates follow in
    /// priority-descending registry order. The first success returns
    /// immediately; if every attempt fails the caller receives one
    /// [`RelayError::AllProvidersUnavailable`] carrying the per-provider
    /// failures in attempt order.
    pub async fn execute(
        &self,
        capability: &str,
        request: &CapabilityRequest,
        preferred: Option<&str>,
    ) -> RelayResult<CapabilityResponse> {
        let mut chain = self.registry.get_by_type(capability).await;

        if let Some(preferred_name) = preferred {
            if let Some(position) = chain.iter().position(|p| p.name() == preferred_name) {
                let provider = chain.remove(position);
                chain.insert(0, provider);
                debug!(
                    capability = capability,
                    preferred = preferred_name,
                    "Preferred provider moved to front of chain"
                );
            } else {
                warn!(
                    capability = capability,
                    preferred = preferred_name,
                    "Preferred provider not registered or not enabled, using normal chain"
                );
            }
        }

        let mut attempts: Vec<AttemptFailure> = Vec::new();
        for provider in chain {
            match self.attempt(provider.as_ref(), request).await {
                Ok(response) => {
                    info!(
                        capability = capability,
                        provider = provider.name(),
                        request_id = %request.request_id,
                        attempts = attempts.len() + 1,
                        "Request served"
                    );
                    return Ok(response);
                }
                Err(error) => {
                    warn!(
                        capability = capability,
                        provider = provider.name(),
                        request_id = %request.request_id,
                        error = %error,
                        "Provider attempt failed, trying next candidate"
                    );
                    attempts.push(AttemptFailure {
                        provider: provider.name().to_string(),
                        error: error.to_string(),
                    });
                }
            }
        }

        Err(RelayError::AllProvidersUnavailable {
            capability: capability.to_string(),
            attempts,
        })
    }

    /// Introspection across registered providers.
    ///
    /// With a capability filter, only that namespace's entries are listed;
    /// without, every entry across every namespace.
    pub async fn available_providers(&self, capability: Option<&str>) -> Vec<AvailableProvider> {
        self.registry
            .providers_info()
            .await
            .into_iter()
            .filter(|info| capability.map_or(true, |c| info.capability == c))
            .map(|info| AvailableProvider {
                name: info.name,
                version: info.config.version.clone(),
                capability: info.capability,
                capabilities: info.capabilities,
                metrics: info.metrics,
                enabled: info.config.enabled,
            })
            .collect()
    }

    /// Run a minimal synthetic request against exactly one named provider.
    ///
    /// Bypasses fallback entirely; used for diagnostics. The attempt feeds
    /// the provider's metrics like any other invocation.
    pub async fn probe_provider(&self, capability: &str, name: &str) -> ProbeReport {
        let start = Instant::now();
        let Some(provider) = self.registry.get(capability, name).await else {
            return ProbeReport {
                success: false,
                response: None,
                error: Some(RelayError::not_found(capability, name).to_string()),
                response_time_ms: 0,
            };
        };

        let request = CapabilityRequest::synthetic(capability);
        match self.attempt(provider.as_ref(), &request).await {
            Ok(response) => ProbeReport {
                success: true,
                response: Some(response),
                error: None,
                response_time_ms: start.elapsed().as_millis() as u64,
            },
            Err(error) => ProbeReport {
                success: false,
                response: None,
                error: Some(error.to_string()),
                response_time_ms: start.elapsed().as_millis() as u64,
            },
        }
    }

    /// One bounded provider invocation, metrics recorded either way
    async fn attempt(
        &self,
        provider: &dyn Provider,
        request: &CapabilityRequest,
    ) -> RelayResult<CapabilityResponse> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.config.call_timeout, provider.execute(request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(RelayError::timeout(provider.name(), self.config.call_timeout)),
        };

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(response) => provider.recorder().record(latency_ms, response.tokens_used, false),
            Err(_) => provider.recorder().record(latency_ms, 0, true),
        }
        result
    }
}
