//! Core memory-side components.
//!
//! This module groups the functional units that sit between a processor
//! pipeline and main memory.

/// Functional units (cache, prefetchers).
pub mod units;
