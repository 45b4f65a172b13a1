//! # LLM Provider Relay
//!
//! Multi-provider registry and orchestration core for LLM backend routing.
//!
//! The relay routes capability requests to one of several interchangeable
//! backend providers:
//!
//! - Providers register under a `(capability, name)` key with a priority
//! - A background monitor keeps per-provider health current
//! - The orchestrator picks candidates in priority order and falls back
//!   across providers on failure, masking single-provider outages
//! - Every attempt feeds the provider's rolling usage metrics
//!
//! There is no transport surface here: the relay is an in-process object
//! graph wired together by [`Relay`], the composition root.
//!
//! ## Usage
//!
//! ```no_run
//! use llm_provider_relay::{CapabilityRequest, ProviderConfig, Relay};
//! # use std::sync::Arc;
//! # async fn example(provider: Arc<dyn llm_provider_relay::Provider>) -> Result<(), Box<dyn std::error::Error>> {
//! let relay = Relay::builder().build();
//! relay
//!     .register_provider("text-generation", provider, ProviderConfig::new("openai", "1.0.0"))
//!     .await?;
//! relay.start().await;
//!
//! let request = CapabilityRequest::new("text-generation", serde_json::json!({"prompt": "hi"}));
//! let response = relay.execute("text-generation", &request, None).await?;
//! # drop(response);
//! relay.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod relay;
pub mod telemetry;

// Re-export the crate surface
pub use config::RelayConfig;
pub use relay::{Relay, RelayBuilder};
pub use telemetry::{init_logging, LoggingConfig, TelemetryError};

pub use relay_core::{
    AttemptFailure, CapabilityRequest, CapabilityResponse, HealthState, MetricsRecorder,
    Provider, ProviderCapabilities, ProviderConfig, ProviderMetrics, RelayError, RelayResult,
};
pub use relay_orchestrator::{
    AvailableProvider, Orchestrator, OrchestratorConfig, ProbeReport,
};
pub use relay_registry::{
    HealthMonitor, HealthMonitorConfig, HealthMonitorHandle, ProviderInfo, ProviderRegistry,
    RegistryKey,
};
