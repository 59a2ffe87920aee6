//! Core types, configuration, and error handling for the Logos agent.
//!
//! This crate provides the shared foundation used by the other Logos
//! crates:
//! - [`LogosError`]: unified error type using `thiserror`
//! - [`LogosConfig`]: configuration loaded from `.logos.toml` plus the
//!   environment layer
//! - Shared types: [`EventKind`], [`TriggerContext`], [`ResponseMode`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{AgentConfig, LlmConfig, LogosConfig, DEFAULT_SIGNATURE};
pub use error::LogosError;
pub use types::{EventKind, OutputFormat, ResponseMode, TriggerContext};

/// A convenience `Result` type for Logos operations.
pub type Result<T> = std::result::Result<T, LogosError>;
