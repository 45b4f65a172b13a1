//! The `(capability, name)`-keyed provider store.
//!
//! The registry is shared mutable state reached from request handling, the
//! periodic health monitor, and manual health checks. All entry mutation
//! happens under one `RwLock` write scope, so a health status and its
//! `last_health_check` timestamp always move together.

use chrono::{DateTime, Utc};
use relay_core::{HealthState, Provider, ProviderCapabilities, ProviderConfig, ProviderMetrics};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Composite registry key: capability namespace plus provider name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryKey {
    /// Capability namespace (e.g. "text-generation")
    pub capability: String,
    /// Provider name, unique within the namespace
    pub name: String,
}

impl RegistryKey {
    /// Create a key
    #[must_use]
    pub fn new(capability: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.capability, self.name)
    }
}

/// Bookkeeping record for one registered provider under one capability
struct RegistryEntry {
    instance: Arc<dyn Provider>,
    config: ProviderConfig,
    health: HealthState,
    registered_at: DateTime<Utc>,
    last_health_check: Option<DateTime<Utc>>,
    /// Insertion sequence; breaks priority ties and guards against a health
    /// result being applied to a since-replaced entry.
    seq: u64,
}

/// Observability snapshot of one registry entry, decoupled from the live map
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    /// Rendered registry key (`capability/name`)
    pub key: String,
    /// Capability namespace
    pub capability: String,
    /// Provider name
    pub name: String,
    /// Registered configuration
    pub config: ProviderConfig,
    /// Static feature flags advertised by the instance
    pub capabilities: ProviderCapabilities,
    /// Current health classification
    pub health: HealthState,
    /// Rolling usage statistics at snapshot time
    pub metrics: ProviderMetrics,
    /// When the entry was registered
    pub registered_at: DateTime<Utc>,
    /// When the entry was last health-checked, if ever
    pub last_health_check: Option<DateTime<Utc>>,
}

/// Central in-memory store mapping `(capability, name)` to provider entries.
///
/// Constructed explicitly by the composition root and shared by reference;
/// there is no process-wide singleton.
pub struct ProviderRegistry {
    entries: RwLock<HashMap<RegistryKey, RegistryEntry>>,
    next_seq: AtomicU64,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Insert or replace the entry under `(capability, config.name)`.
    ///
    /// Health starts at [`HealthState::Unknown`]; the entry is not eligible
    /// for [`get_best`](Self::get_best) until a probe succeeds. Replacing an
    /// existing key is last-write-wins and logged as a warning.
    pub async fn register(
        &self,
        capability: impl Into<String>,
        instance: Arc<dyn Provider>,
        config: ProviderConfig,
    ) {
        let key = RegistryKey::new(capability, config.name.clone());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = RegistryEntry {
            instance,
            config,
            health: HealthState::Unknown,
            registered_at: Utc::now(),
            last_health_check: None,
            seq,
        };

        let mut entries = self.entries.write().await;
        if entries.insert(key.clone(), entry).is_some() {
            warn!(key = %key, "Overwriting existing provider registration");
        } else {
            info!(key = %key, "Provider registered");
        }
    }

    /// Remove the entry under `(capability, name)`.
    ///
    /// Returns whether anything was removed; absent keys are not an error.
    pub async fn unregister(&self, capability: &str, name: &str) -> bool {
        let key = RegistryKey::new(capability, name);
        let removed = self.entries.write().await.remove(&key).is_some();
        if removed {
            info!(key = %key, "Provider unregistered");
        }
        removed
    }

    /// Direct lookup without health filtering
    pub async fn get(&self, capability: &str, name: &str) -> Option<Arc<dyn Provider>> {
        let key = RegistryKey::new(capability, name);
        self.entries
            .read()
            .await
            .get(&key)
            .map(|entry| Arc::clone(&entry.instance))
    }

    /// Enabled providers for a capability, priority-descending.
    ///
    /// Ties are broken by insertion order, so the result is deterministic;
    /// fallback chains are built from this ordering.
    pub async fn get_by_type(&self, capability: &str) -> Vec<Arc<dyn Provider>> {
        let entries = self.entries.read().await;
        let mut candidates: Vec<&RegistryEntry> = entries
            .iter()
            .filter(|(key, entry)| key.capability == capability && entry.config.enabled)
            .map(|(_, entry)| entry)
            .collect();
        candidates.sort_by(|a, b| b.config.priority.cmp(&a.config.priority).then(a.seq.cmp(&b.seq)));
        candidates
            .into_iter()
            .map(|entry| Arc::clone(&entry.instance))
            .collect()
    }

    /// Highest-priority healthy provider for a capability, if any.
    ///
    /// Entries that have never passed a health check (`Unknown`) are not
    /// eligible. Consistency under a concurrent health flip is
    /// read-committed: a status update committed before this call acquires
    /// the read lock is visible, one committed after is not; no snapshot
    /// isolation is promised across separate registry calls.
    pub async fn get_best(&self, capability: &str) -> Option<Arc<dyn Provider>> {
        let entries = self.entries.read().await;
        let mut candidates: Vec<&RegistryEntry> = entries
            .iter()
            .filter(|(key, entry)| {
                key.capability == capability
                    && entry.config.enabled
                    && entry.health.is_healthy()
            })
            .map(|(_, entry)| entry)
            .collect();
        candidates.sort_by(|a, b| b.config.priority.cmp(&a.config.priority).then(a.seq.cmp(&b.seq)));
        candidates
            .first()
            .map(|entry| Arc::clone(&entry.instance))
    }

    /// Distinct capability namespaces currently registered, sorted
    pub async fn provider_types(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut types: Vec<String> = entries
            .keys()
            .map(|key| key.capability.clone())
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    /// Snapshot every entry for observability, decoupled from the live map
    pub async fn providers_info(&self) -> Vec<ProviderInfo> {
        let entries = self.entries.read().await;
        let mut infos: Vec<ProviderInfo> = entries
            .iter()
            .map(|(key, entry)| ProviderInfo {
                key: key.to_string(),
                capability: key.capability.clone(),
                name: key.name.clone(),
                config: entry.config.clone(),
                capabilities: entry.instance.capabilities(),
                health: entry.health,
                metrics: entry.instance.metrics(),
                registered_at: entry.registered_at,
                last_health_check: entry.last_health_check,
            })
            .collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        infos
    }

    /// Number of registered entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the registry holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Apply a health check result to an entry.
    ///
    /// Status and `last_health_check` are updated in the same write-lock
    /// scope. When `observed_seq` is given, the update is discarded if the
    /// entry was replaced since the caller snapshotted it; returns whether
    /// the update was applied.
    pub async fn set_health(
        &self,
        key: &RegistryKey,
        healthy: bool,
        observed_seq: Option<u64>,
    ) -> bool {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            debug!(key = %key, "Health result for unregistered key, dropping");
            return false;
        };
        if let Some(seq) = observed_seq {
            if entry.seq != seq {
                debug!(key = %key, "Health result for replaced entry, dropping");
                return false;
            }
        }

        let new_state = if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };
        if entry.health != new_state {
            info!(key = %key, from = %entry.health, to = %new_state, "Health transition");
        }
        entry.health = new_state;
        entry.last_health_check = Some(Utc::now());
        true
    }

    /// Snapshot `(key, seq, instance)` triples for a health-check fan-out.
    ///
    /// `capability`/`name` narrow the sweep; both `None` selects everything.
    pub(crate) async fn snapshot_for_check(
        &self,
        capability: Option<&str>,
        name: Option<&str>,
    ) -> Vec<(RegistryKey, u64, Arc<dyn Provider>)> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|(key, _)| capability.map_or(true, |c| key.capability == c))
            .filter(|(key, _)| name.map_or(true, |n| key.name == n))
            .map(|(key, entry)| (key.clone(), entry.seq, Arc::clone(&entry.instance)))
            .collect()
    }
}
