//! Integration tests for the LLM Provider Relay
//!
//! This crate provides integration tests covering:
//! - Relay lifecycle (registration, monitor start/stop)
//! - Health monitoring across the registry
//! - Fallback orchestration and metrics
//! - End-to-end request flows

pub mod helpers;

// Re-export commonly used items
pub use helpers::*;
pub use mock_providers::*;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod orchestration_tests;
