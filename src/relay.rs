//! The composition root.
//!
//! [`Relay`] owns the registry, the background health monitor, and the
//! orchestrator, and wires them together. The registry is an explicitly
//! constructed object shared by reference; nothing here is a process-wide
//! singleton, so tests get a fresh instance per case.

use crate::config::RelayConfig;
use relay_core::{
    CapabilityRequest, CapabilityResponse, Provider, ProviderConfig, RelayError, RelayResult,
};
use relay_orchestrator::{AvailableProvider, Orchestrator, ProbeReport};
use relay_registry::{
    HealthMonitor, HealthMonitorHandle, ProviderInfo, ProviderRegistry, RegistryKey,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Builder for [`Relay`]
#[derive(Debug, Default)]
pub struct RelayBuilder {
    config: RelayConfig,
}

impl RelayBuilder {
    /// Create a builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the relay
    #[must_use]
    pub fn build(self) -> Relay {
        let registry = Arc::new(ProviderRegistry::new());
        let orchestrator = Orchestrator::new(
            Arc::clone(&registry),
            self.config.orchestrator.clone(),
        );
        Relay {
            registry,
            orchestrator,
            config: self.config,
            monitor: Mutex::new(None),
        }
    }
}

/// The wired-together provider relay subsystem
pub struct Relay {
    registry: Arc<ProviderRegistry>,
    orchestrator: Orchestrator,
    config: RelayConfig,
    monitor: Mutex<Option<HealthMonitorHandle>>,
}

impl Relay {
    /// Start building a relay
    #[must_use]
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// The shared registry
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// The orchestrator
    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Initialize and register a provider under a capability namespace.
    ///
    /// Runs the provider's `initialize()` first; on failure the provider is
    /// not placed into the registry and the error is fatal only for this
    /// registration attempt.
    pub async fn register_provider(
        &self,
        capability: &str,
        instance: Arc<dyn Provider>,
        config: ProviderConfig,
    ) -> RelayResult<()> {
        if let Err(error) = instance.initialize().await {
            warn!(
                capability = capability,
                provider = %config.name,
                error = %error,
                "Provider initialization failed, not registering"
            );
            return Err(RelayError::initialization(config.name, error.to_string()));
        }
        self.registry.register(capability, instance, config).await;
        Ok(())
    }

    /// Remove a provider registration; absent keys are not an error
    pub async fn unregister_provider(&self, capability: &str, name: &str) -> bool {
        self.registry.unregister(capability, name).await
    }

    /// Start the background health monitor.
    ///
    /// Idempotent: a second call while the monitor is running does nothing.
    pub async fn start(&self) {
        let mut monitor = self.monitor.lock().await;
        if monitor.is_some() {
            return;
        }
        let handle =
            HealthMonitor::new(Arc::clone(&self.registry), self.config.health.clone()).spawn();
        *monitor = Some(handle);
        info!(
            interval_secs = self.config.health.interval.as_secs(),
            "Health monitor started"
        );
    }

    /// Stop the background health monitor and wait for it to exit.
    ///
    /// Safe to call without a prior [`start`](Self::start).
    pub async fn shutdown(&self) {
        let handle = self.monitor.lock().await.take();
        if let Some(handle) = handle {
            handle.shutdown().await;
            info!("Health monitor stopped");
        }
    }

    /// On-demand health check, shared with the periodic loop.
    ///
    /// With both filters set, checks exactly that entry; with neither,
    /// checks all entries.
    pub async fn health_check(
        &self,
        capability: Option<&str>,
        name: Option<&str>,
    ) -> HashMap<RegistryKey, bool> {
        HealthMonitor::new(Arc::clone(&self.registry), self.config.health.clone())
            .check(capability, name)
            .await
    }

    /// Satisfy a capability request, falling back across providers
    pub async fn execute(
        &self,
        capability: &str,
        request: &CapabilityRequest,
        preferred: Option<&str>,
    ) -> RelayResult<CapabilityResponse> {
        self.orchestrator.execute(capability, request, preferred).await
    }

    /// Introspection across registered providers
    pub async fn available_providers(&self, capability: Option<&str>) -> Vec<AvailableProvider> {
        self.orchestrator.available_providers(capability).await
    }

    /// Diagnostics probe against exactly one named provider
    pub async fn probe_provider(&self, capability: &str, name: &str) -> ProbeReport {
        self.orchestrator.probe_provider(capability, name).await
    }

    /// Observability snapshot of every registry entry
    pub async fn providers_info(&self) -> Vec<ProviderInfo> {
        self.registry.providers_info().await
    }
}
