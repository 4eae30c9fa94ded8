//! rampart-core: Shared types, configuration, and error handling for Rampart.
//!
//! This crate provides the foundational types used across the attack-graph
//! risk engine:
//! - Entity records (assets, services, findings, remediation actions) as
//!   delivered by the external entity store
//! - Event types for consumption by the hosting layer
//! - Engine settings
//! - Common error types

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::EngineSettings;
pub use error::RampartError;
