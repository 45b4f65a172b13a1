//! # Relay Core
//!
//! Core types, traits, and error handling for the provider relay.
//!
//! This crate provides the foundational pieces used throughout the relay:
//! - The provider contract ([`Provider`]) every pluggable backend implements
//! - Capability request and response types
//! - Per-provider rolling usage metrics
//! - Error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod request;

// Re-export commonly used types
pub use config::ProviderConfig;
pub use error::{AttemptFailure, RelayError, RelayResult};
pub use metrics::{MetricsRecorder, ProviderMetrics};
pub use provider::{HealthState, Provider, ProviderCapabilities};
pub use request::{CapabilityRequest, CapabilityResponse};
