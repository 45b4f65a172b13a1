//! # Relay Registry
//!
//! The central in-memory provider store and its background health monitor.
//!
//! This crate provides:
//! - [`ProviderRegistry`]: `(capability, name)`-keyed storage with
//!   priority-ordered, health-gated selection
//! - [`HealthMonitor`]: a cancellable periodic task that fans out health
//!   probes across every registered entry

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod health;
pub mod registry;

// Re-export main types
pub use health::{HealthMonitor, HealthMonitorConfig, HealthMonitorHandle};
pub use registry::{ProviderInfo, ProviderRegistry, RegistryKey};
