//! # Relay Orchestrator
//!
//! The request-routing layer of the provider relay.
//!
//! This crate provides:
//! - [`Orchestrator::execute`]: preferred-provider override plus a
//!   priority-ordered fallback walk that masks single-provider failures
//! - [`Orchestrator::available_providers`]: introspection across
//!   capability namespaces
//! - [`Orchestrator::probe_provider`]: single-provider diagnostics that
//!   never fail outright

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod orchestrator;

// Re-export main types
pub use orchestrator::{AvailableProvider, Orchestrator, OrchestratorConfig, ProbeReport};
