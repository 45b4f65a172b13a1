//! Top-level relay configuration.

use crate::telemetry::LoggingConfig;
use relay_orchestrator::OrchestratorConfig;
use relay_registry::HealthMonitorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the whole relay subsystem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Background health monitoring
    #[serde(default)]
    pub health: HealthMonitorConfig,
    /// Request routing and fallback
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Logging setup
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health sweep interval
    #[must_use]
    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health.interval = interval;
        self
    }

    /// Set the per-attempt call timeout
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.orchestrator.call_timeout = timeout;
        self
    }

    /// Replace the health monitor configuration
    #[must_use]
    pub fn with_health(mut self, health: HealthMonitorConfig) -> Self {
        self.health = health;
        self
    }

    /// Replace the orchestrator configuration
    #[must_use]
    pub fn with_orchestrator(mut self, orchestrator: OrchestratorConfig) -> Self {
        self.orchestrator = orchestrator;
        self
    }
}
