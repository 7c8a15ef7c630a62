//! Hardware Prefetcher implementations.
//!
//! This module contains the interface and implementations for the hardware
//! prefetchers used to hide memory latency. Prefetching is a two-phase protocol:
//! 1. **Notify:** The cache reports every demand access; the prefetcher answers
//!    with the [`DecisionTime`] at which it next wants to be asked for a candidate.
//! 2. **Retrieve:** At or after that time the cache pulls one candidate at a time.
//!
//! Individual strategies only predict addresses ([`AddressPredictor`]). The
//! [`QueuedPrefetcher`] turns those predictions into pending candidates, and the
//! [`CompositePrefetcher`] aggregates several queued strategies behind the same
//! [`Prefetcher`] interface.

/// Composite prefetcher (aggregates several strategies in priority order).
pub mod composite;

/// Next-line prefetcher (prefetches sequential cache lines).
pub mod next_line;

/// Queued base that buffers predictions until the cache retrieves them.
pub mod queued;

/// Prefetch statistics counters.
pub mod stats;

/// Stream prefetcher (detects ascending/descending access streams).
pub mod stream;

/// Stride prefetcher (detects constant-stride access patterns).
pub mod stride;

/// Tagged prefetcher (prefetches on demand misses and prefetch hits).
pub mod tagged;

pub use self::composite::{CompositePrefetcher, StrategySlot};
pub use self::next_line::NextLinePrefetcher;
pub use self::queued::QueuedPrefetcher;
pub use self::stats::PrefetchStats;
pub use self::stream::StreamPrefetcher;
pub use self::stride::StridePrefetcher;
pub use self::tagged::TaggedPrefetcher;

use crate::common::{
    DecisionTime, FALLBACK_LINE_BYTES, MemoryAccess, PrefetchCandidate, PrefetchError,
};
use crate::config::{CompositeConfig, PrefetchConfig, Prefetcher as PrefetcherKind};

/// Trait for cache prefetcher implementations.
///
/// Prefetchers observe memory access patterns and queue prefetch
/// candidates to reduce cache miss penalties.
pub trait Prefetcher: Send + Sync {
    /// Short human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// Observes a demand access.
    ///
    /// Called by the cache on each access so the prefetcher can
    /// learn access patterns and queue prefetch candidates.
    ///
    /// # Arguments
    ///
    /// * `access` - The observed demand access.
    ///
    /// # Returns
    ///
    /// The earliest tick at which a candidate should be retrieved, or
    /// [`DecisionTime::NEVER`] if nothing is pending.
    fn notify(&mut self, access: &MemoryAccess) -> DecisionTime;

    /// Retrieves the next pending candidate, if any.
    ///
    /// May consume the candidate from the prefetcher's internal queue.
    fn next_candidate(&mut self) -> Option<PrefetchCandidate>;

    /// Returns the earliest pending decision time without observing a new access.
    fn next_ready_time(&self) -> DecisionTime;

    /// Predicts candidates for `access` directly, bypassing the queue.
    ///
    /// This is the single-shot prediction entry point of the base contract.
    fn calculate_prefetch(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate>;

    /// Returns a snapshot of this prefetcher's counters.
    fn stats(&self) -> PrefetchStats {
        PrefetchStats::default()
    }
}

/// Trait for address prediction strategies.
///
/// A strategy only decides *which* addresses look worth fetching; queueing,
/// alignment, filtering and timing belong to [`QueuedPrefetcher`].
pub trait AddressPredictor: Send + Sync {
    /// Short human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the strategy must see cache hits even when the queue
    /// is configured to train on misses only.
    fn requires_hits(&self) -> bool {
        false
    }

    /// Observes a memory access and generates prefetch candidates.
    ///
    /// # Arguments
    ///
    /// * `access` - The observed demand access.
    ///
    /// # Returns
    ///
    /// Candidates to prefetch. Empty if no prefetches are needed.
    fn predict(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate>;
}

/// Normalizes a configured line size; zero or non-powers-of-two fall back to 64.
pub(crate) const fn line_size(line_bytes: usize) -> u64 {
    if line_bytes.is_power_of_two() {
        line_bytes as u64
    } else {
        FALLBACK_LINE_BYTES
    }
}

/// Builds a single queued strategy of the given kind.
///
/// # Arguments
///
/// * `kind` - A leaf prefetcher kind (not `None` or `Composite`).
/// * `line_bytes` - Cache line size; must be a non-zero power of two.
/// * `params` - Shared prefetch parameters.
///
/// # Errors
///
/// Returns [`PrefetchError::InvalidConfig`] for non-leaf kinds or a bad line size.
pub fn build_strategy(
    kind: PrefetcherKind,
    line_bytes: u64,
    params: &PrefetchConfig,
) -> Result<Box<dyn Prefetcher>, PrefetchError> {
    if line_bytes == 0 || !line_bytes.is_power_of_two() {
        return Err(PrefetchError::invalid_config(format!(
            "line size {line_bytes} is not a power of two"
        )));
    }
    let line = line_bytes as usize;

    let strategy: Box<dyn Prefetcher> = match kind {
        PrefetcherKind::NextLine => Box::new(QueuedPrefetcher::new(
            NextLinePrefetcher::new(line, params.degree),
            line_bytes,
            params,
        )),
        PrefetcherKind::Stride => Box::new(QueuedPrefetcher::new(
            StridePrefetcher::new(line, params.table_size, params.degree),
            line_bytes,
            params,
        )),
        PrefetcherKind::Stream => Box::new(QueuedPrefetcher::new(
            StreamPrefetcher::new(line, params.degree),
            line_bytes,
            params,
        )),
        PrefetcherKind::Tagged => Box::new(QueuedPrefetcher::new(
            TaggedPrefetcher::new(line, params.degree),
            line_bytes,
            params,
        )),
        PrefetcherKind::None | PrefetcherKind::Composite => {
            return Err(PrefetchError::invalid_config(format!(
                "{kind:?} is not a prefetch strategy"
            )));
        }
    };
    Ok(strategy)
}

/// Builds the prefetcher a cache level is configured with.
///
/// # Arguments
///
/// * `kind` - Configured prefetcher kind.
/// * `line_bytes` - Cache line size in bytes.
/// * `params` - Shared prefetch parameters.
/// * `composite` - Strategy list, consulted only for `Composite`.
///
/// # Returns
///
/// `None` for `Prefetcher::None`, otherwise the boxed prefetcher.
///
/// # Errors
///
/// Propagates any [`PrefetchError`] raised while building strategies.
pub fn build_prefetcher(
    kind: PrefetcherKind,
    line_bytes: u64,
    params: &PrefetchConfig,
    composite: &CompositeConfig,
) -> Result<Option<Box<dyn Prefetcher>>, PrefetchError> {
    match kind {
        PrefetcherKind::None => Ok(None),
        PrefetcherKind::Composite => Ok(Some(Box::new(CompositePrefetcher::from_config(
            composite, params, line_bytes,
        )?))),
        leaf => build_strategy(leaf, line_bytes, params).map(Some),
    }
}
