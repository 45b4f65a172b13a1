//! Provider configuration descriptor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptor attached to a registered provider.
///
/// `name` is unique within one capability namespace; `priority` orders
/// candidates for selection (higher wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name, unique within a capability type
    pub name: String,
    /// Provider implementation version
    pub version: String,
    /// Whether the provider participates in selection
    pub enabled: bool,
    /// Selection priority, higher is preferred
    pub priority: i32,
    /// Opaque descriptor metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ProviderConfig {
    /// Create an enabled config with default priority
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            enabled: true,
            priority: 0,
            metadata: HashMap::new(),
        }
    }

    /// Set the selection priority
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Enable or disable the provider
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Attach a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
