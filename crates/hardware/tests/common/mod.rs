//! Shared test infrastructure.

/// Tracing setup and access/candidate helpers.
pub mod harness;
