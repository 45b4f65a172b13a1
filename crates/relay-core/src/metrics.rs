//! Per-provider rolling usage metrics.
//!
//! Every provider instance owns one [`MetricsRecorder`]; the orchestrator
//! records an observation after every invocation attempt, success or not.
//! Averages are maintained incrementally, so the final values for a fixed
//! multiset of observations do not depend on arrival order.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of a provider's rolling statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    /// Total invocation attempts, including failures
    pub total_calls: u64,
    /// Total tokens consumed across successful attempts
    pub total_tokens: u64,
    /// Running mean latency in milliseconds
    pub average_latency_ms: f64,
    /// Fraction of attempts that failed, in `[0, 1]`
    pub error_rate: f64,
    /// Timestamp of the most recent attempt
    pub last_used: Option<DateTime<Utc>>,
}

impl Default for ProviderMetrics {
    fn default() -> Self {
        Self {
            total_calls: 0,
            total_tokens: 0,
            average_latency_ms: 0.0,
            error_rate: 0.0,
            last_used: None,
        }
    }
}

/// Thread-safe accumulator behind every provider's metrics.
///
/// The critical section is a handful of arithmetic operations, so a
/// blocking `parking_lot` mutex is used rather than an async lock.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    inner: Mutex<ProviderMetrics>,
}

impl MetricsRecorder {
    /// Create a recorder with zeroed statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation attempt.
    ///
    /// `tokens` should be 0 on error paths unless partial consumption is
    /// known. Both the latency mean and the error rate use the incremental
    /// mean update, which reproduces the true running mean exactly.
    pub fn record(&self, latency_ms: f64, tokens: u64, is_error: bool) {
        let mut m = self.inner.lock();

        let n = m.total_calls + 1;
        let n_f = n as f64;
        let prev = (n - 1) as f64;

        m.average_latency_ms = (m.average_latency_ms * prev + latency_ms) / n_f;
        let error_indicator = if is_error { 1.0 } else { 0.0 };
        m.error_rate = (m.error_rate * prev + error_indicator) / n_f;

        m.total_calls = n;
        m.total_tokens += tokens;
        m.last_used = Some(Utc::now());
    }

    /// Take a point-in-time snapshot
    #[must_use]
    pub fn snapshot(&self) -> ProviderMetrics {
        self.inner.lock().clone()
    }
}
