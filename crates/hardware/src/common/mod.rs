//! Common types shared by the cache and prefetch units.
//!
//! This module provides the fundamental building blocks used across the crate.
//! It includes:
//! 1. **Decision Time:** The simulated timestamp prefetchers report, with its sentinel.
//! 2. **Constants:** Page and line constants.
//! 3. **Memory Access:** Access events and prefetch candidates.
//! 4. **Error Handling:** The construction error type.

/// Common constants used by the cache and prefetchers.
pub mod constants;

/// Memory access and prefetch candidate definitions.
pub mod data;

/// Error types for prefetcher construction.
pub mod error;

/// Decision time type and fusion.
pub mod time;

pub use constants::{FALLBACK_LINE_BYTES, PAGE_SHIFT, same_page};
pub use data::{AccessType, MemoryAccess, PrefetchCandidate};
pub use error::PrefetchError;
pub use time::DecisionTime;
