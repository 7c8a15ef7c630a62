//! Memory-side functional units.
//!
//! This module contains the cache model and the hardware prefetchers that
//! feed it.

/// Set-associative cache that drives a prefetcher.
pub mod cache;

/// Hardware prefetcher implementations (next-line, stride, stream, tagged, composite).
pub mod prefetch;
