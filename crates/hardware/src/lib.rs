//! Hardware prefetch library for the rvsim cache hierarchy.
//!
//! This crate implements the prefetch side of a cycle-level memory model:
//! 1. **Strategies:** Next-line, stride, stream and tagged address predictors.
//! 2. **Queueing:** A bounded, priority-ordered candidate queue shared by every strategy.
//! 3. **Composition:** A composite prefetcher that aggregates any subset of
//!    strategies behind the single [`Prefetcher`] interface.
//! 4. **Cache:** A set-associative cache that drives a prefetcher through the
//!    notify/retrieve protocol.
//! 5. **Configuration:** JSON-deserializable cache and prefetch settings.

/// Common types (decision time, access events, candidates, errors).
pub mod common;
/// Cache and prefetch configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Cache and prefetch units.
pub mod core;

/// Root configuration type; use `Config::default()` or [`Config::from_json`].
pub use crate::config::Config;
/// Composite prefetcher and its construction slots.
pub use crate::core::units::prefetch::{CompositePrefetcher, StrategySlot};
/// Prefetcher capability trait implemented by every strategy and the composite.
pub use crate::core::units::prefetch::Prefetcher;
/// Decision time, access event and candidate types.
pub use crate::common::{DecisionTime, MemoryAccess, PrefetchCandidate, PrefetchError};
