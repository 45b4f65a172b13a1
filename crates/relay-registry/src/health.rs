//! Background health monitoring for registered providers.
//!
//! The monitor keeps every entry's health classification current without
//! blocking request traffic. Each tick fans out one probe per entry, waits
//! for all of them to settle, and writes the results back. One hung or
//! failing provider never prevents the rest from being checked, and the
//! loop itself keeps ticking regardless of individual failures.

use crate::registry::{ProviderRegistry, RegistryKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Health monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMonitorConfig {
    /// Interval between periodic sweeps
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Budget for one provider's probe; exceeding it counts as unhealthy
    #[serde(with = "humantime_serde")]
    pub check_timeout: Duration,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            check_timeout: Duration::from_secs(10),
        }
    }
}

impl HealthMonitorConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep interval
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the per-probe timeout
    #[must_use]
    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }
}

/// Periodic health checker over a shared [`ProviderRegistry`].
///
/// Also usable on demand via [`check`](Self::check) for administrative
/// triggers; the periodic loop and manual calls share the same fan-out.
pub struct HealthMonitor {
    registry: Arc<ProviderRegistry>,
    config: HealthMonitorConfig,
}

impl HealthMonitor {
    /// Create a monitor over the given registry
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, config: HealthMonitorConfig) -> Self {
        Self { registry, config }
    }

    /// Probe entries and write the results back to the registry.
    ///
    /// With both filters set, exactly one entry is checked; with neither,
    /// every entry is. Probes run concurrently and the call returns once
    /// all have settled. A probe that errors or exceeds the timeout maps to
    /// `false`; the error is logged, never propagated. Each result lands in
    /// the registry together with a fresh `last_health_check` timestamp,
    /// unless the entry was replaced mid-flight.
    pub async fn check(
        &self,
        capability: Option<&str>,
        name: Option<&str>,
    ) -> HashMap<RegistryKey, bool> {
        let snapshot = self.registry.snapshot_for_check(capability, name).await;
        if snapshot.is_empty() {
            debug!(?capability, ?name, "No entries match health check filter");
            return HashMap::new();
        }

        let timeout = self.config.check_timeout;
        let probes = snapshot.into_iter().map(|(key, seq, instance)| async move {
            let healthy = match tokio::time::timeout(timeout, instance.health_check()).await {
                Ok(Ok(healthy)) => healthy,
                Ok(Err(error)) => {
                    warn!(key = %key, error = %error, "Health check raised, marking unhealthy");
                    false
                }
                Err(_) => {
                    warn!(key = %key, timeout_ms = timeout.as_millis(), "Health check timed out");
                    false
                }
            };
            (key, seq, healthy)
        });

        let results = futures::future::join_all(probes).await;

        let mut outcome = HashMap::with_capacity(results.len());
        for (key, seq, healthy) in results {
            self.registry.set_health(&key, healthy, Some(seq)).await;
            outcome.insert(key, healthy);
        }
        outcome
    }

    /// Spawn the periodic loop on the current runtime.
    ///
    /// An initial sweep runs immediately, then one per configured interval
    /// until the returned handle is shut down.
    #[must_use]
    pub fn spawn(self) -> HealthMonitorHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let interval = self.config.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => {
                        info!("Health monitor stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let results = self.check(None, None).await;
                        let healthy = results.values().filter(|h| **h).count();
                        debug!(
                            checked = results.len(),
                            healthy = healthy,
                            "Health sweep complete"
                        );
                    }
                }
            }
        });

        HealthMonitorHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Handle owning a running health monitor task
pub struct HealthMonitorHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HealthMonitorHandle {
    /// Signal the loop to stop and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(error) = self.task.await {
            warn!(error = %error, "Health monitor task join failed");
        }
    }

    /// Abort the loop without waiting
    pub fn abort(&self) {
        self.task.abort();
    }
}
