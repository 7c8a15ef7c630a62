//! Error definitions for prefetcher construction.
//!
//! Only construction can fail: once built, every prefetcher operation is a
//! bounded computation over owned state. This module provides the following:
//! 1. **Configuration Errors:** Inconsistent or malformed prefetcher configuration.
//! 2. **Parse Errors:** JSON configuration that cannot be deserialized.

use thiserror::Error;

use crate::config::Prefetcher;

/// Errors raised while building a prefetcher or loading its configuration.
#[derive(Error, Debug)]
pub enum PrefetchError {
    /// A strategy slot is enabled but carries no strategy instance.
    #[error("strategy {kind:?} is enabled but no instance was supplied")]
    MissingStrategy {
        /// Kind of the offending slot.
        kind: Prefetcher,
    },

    /// The configuration is structurally invalid.
    #[error("invalid prefetch configuration: {0}")]
    InvalidConfig(String),

    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PrefetchError {
    /// Creates an [`PrefetchError::InvalidConfig`] from any message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
