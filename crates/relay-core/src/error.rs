//! Error types for the provider relay.
//!
//! One taxonomy covers the whole subsystem: registry lookups, provider
//! execution, health probing, and provider initialization. Callers of the
//! orchestrator only ever see a single aggregate failure; per-provider
//! errors are recovered internally and surface through logs and metrics.

use std::time::Duration;

/// Result alias used throughout the relay
pub type RelayResult<T> = Result<T, RelayError>;

/// One failed attempt inside a fallback walk
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    /// Name of the provider that was attempted
    pub provider: String,
    /// Rendered error for the attempt
    pub error: String,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Errors produced by the relay subsystem
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// No entry registered under the requested key
    #[error("Provider not found: {capability}/{name}")]
    NotFound {
        /// Capability namespace that was queried
        capability: String,
        /// Provider name that was queried
        name: String,
    },

    /// No healthy candidate exists for a capability
    #[error("No healthy provider for capability: {capability}")]
    NoHealthyProvider {
        /// Capability namespace that was queried
        capability: String,
    },

    /// A single provider invocation failed
    #[error("Provider '{provider}' failed: {message}")]
    Execution {
        /// Provider that failed
        provider: String,
        /// Failure description
        message: String,
        /// Whether the failure is worth retrying elsewhere
        retryable: bool,
    },

    /// A provider invocation exceeded its time budget
    #[error("Provider '{provider}' timed out after {timeout:?}")]
    Timeout {
        /// Provider that timed out
        provider: String,
        /// The budget that was exceeded
        timeout: Duration,
    },

    /// Every candidate in the fallback chain failed
    #[error("All providers unavailable for capability '{capability}' ({} attempts)", attempts.len())]
    AllProvidersUnavailable {
        /// Capability that could not be satisfied
        capability: String,
        /// Per-provider failures, in attempt order
        attempts: Vec<AttemptFailure>,
    },

    /// A health probe failed; recovered inside the health monitor
    #[error("Health check failed for '{provider}': {message}")]
    HealthCheck {
        /// Provider whose probe failed
        provider: String,
        /// Failure description
        message: String,
    },

    /// Provider setup failed; fatal only for that registration attempt
    #[error("Initialization failed for '{provider}': {message}")]
    Initialization {
        /// Provider that failed to initialize
        provider: String,
        /// Failure description
        message: String,
    },

    /// The request does not satisfy the provider contract
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Create a not-found error for a registry key
    pub fn not_found(capability: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            capability: capability.into(),
            name: name.into(),
        }
    }

    /// Create an execution failure
    pub fn execution(
        provider: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self::Execution {
            provider: provider.into(),
            message: message.into(),
            retryable,
        }
    }

    /// Create a timeout error
    pub fn timeout(provider: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            provider: provider.into(),
            timeout,
        }
    }

    /// Create a health check failure
    pub fn health_check(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HealthCheck {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an initialization failure
    pub fn initialization(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Initialization {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether trying another provider could plausibly succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Execution { retryable, .. } => *retryable,
            Self::Timeout { .. } | Self::HealthCheck { .. } => true,
            _ => false,
        }
    }

    /// Name of the provider the error is attributed to, if any
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Execution { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::HealthCheck { provider, .. }
            | Self::Initialization { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
