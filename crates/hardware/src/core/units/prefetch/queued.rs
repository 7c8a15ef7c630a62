//! Queued Prefetcher.
//!
//! The base every prediction strategy plugs into. On each observed access it
//! asks its [`AddressPredictor`] for addresses, block-aligns them, filters
//! lines that are already pending and inserts the rest into a bounded queue
//! ordered by priority. The cache later drains the queue one candidate at a
//! time through [`Prefetcher::next_candidate`].
//!
//! Queue discipline:
//! * Higher priority first; FIFO among equal priorities.
//! * A duplicate line is dropped (counted as a buffer hit). If the duplicate
//!   carries a higher priority, the pending entry is promoted.
//! * When full, the oldest entry of the lowest priority is squashed unless
//!   the newcomer ranks below it, in which case the newcomer is dropped.
//!   Both outcomes count as removed-full.

use std::collections::VecDeque;

use tracing::trace;

use super::{AddressPredictor, PrefetchStats, Prefetcher};
use crate::common::{
    DecisionTime, FALLBACK_LINE_BYTES, MemoryAccess, PrefetchCandidate, same_page,
};
use crate::config::PrefetchConfig;

/// A candidate waiting in the queue.
#[derive(Clone, Copy, Debug)]
struct PendingPrefetch {
    candidate: PrefetchCandidate,
    /// Tick at which the candidate becomes ready.
    ready: u64,
}

/// Queued prefetcher state.
#[derive(Debug)]
pub struct QueuedPrefetcher<P> {
    /// Strategy producing raw predictions.
    predictor: P,
    /// Pending candidates, highest priority at the front.
    queue: VecDeque<PendingPrefetch>,
    /// Maximum number of pending candidates.
    queue_size: usize,
    /// Ticks between an access and its candidates becoming ready.
    latency: u64,
    /// Mask that clears the line offset bits.
    line_mask: u64,
    /// Ignore hits unless the predictor requires them.
    on_miss_only: bool,
    stats: PrefetchStats,
}

impl<P: AddressPredictor> QueuedPrefetcher<P> {
    /// Creates a queued prefetcher around `predictor`.
    ///
    /// # Arguments
    ///
    /// * `predictor` - The address prediction strategy.
    /// * `line_bytes` - Cache line size; falls back to 64 if not a power of two.
    /// * `params` - Queue size, latency and miss-only filtering.
    pub fn new(predictor: P, line_bytes: u64, params: &PrefetchConfig) -> Self {
        let line = if line_bytes.is_power_of_two() {
            line_bytes
        } else {
            FALLBACK_LINE_BYTES
        };

        Self {
            predictor,
            queue: VecDeque::with_capacity(params.queue_size.max(1)),
            queue_size: params.queue_size.max(1),
            latency: params.latency,
            line_mask: !(line - 1),
            on_miss_only: params.on_miss_only,
            stats: PrefetchStats::default(),
        }
    }

    /// Returns the wrapped strategy.
    pub const fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Returns the number of pending candidates.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn observes(&self, access: &MemoryAccess) -> bool {
        !self.on_miss_only || !access.hit || self.predictor.requires_hits()
    }

    /// Inserts an aligned candidate, applying the duplicate and capacity rules.
    fn insert(&mut self, candidate: PrefetchCandidate, ready: u64) {
        if let Some(pos) = self
            .queue
            .iter()
            .position(|p| p.candidate.addr == candidate.addr)
        {
            self.stats.buffer_hits += 1;
            if candidate.priority > self.queue[pos].candidate.priority {
                if let Some(mut existing) = self.queue.remove(pos) {
                    existing.candidate.priority = candidate.priority;
                    self.enqueue(existing);
                }
            }
            return;
        }

        if self.queue.len() >= self.queue_size {
            self.stats.removed_full += 1;
            let Some(lowest) = self.queue.back().map(|p| p.candidate.priority) else {
                return;
            };
            if candidate.priority < lowest {
                trace!(addr = candidate.addr, "prefetch queue full, dropping candidate");
                return;
            }
            // Sorted descending, so the first match is the oldest of the lowest.
            if let Some(idx) = self
                .queue
                .iter()
                .position(|p| p.candidate.priority == lowest)
            {
                let _ = self.queue.remove(idx);
            }
        }

        self.enqueue(PendingPrefetch { candidate, ready });
    }

    fn enqueue(&mut self, pending: PendingPrefetch) {
        let pos = self
            .queue
            .iter()
            .position(|p| p.candidate.priority < pending.candidate.priority)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, pending);
    }
}

impl<P: AddressPredictor> Prefetcher for QueuedPrefetcher<P> {
    fn name(&self) -> &'static str {
        self.predictor.name()
    }

    fn notify(&mut self, access: &MemoryAccess) -> DecisionTime {
        if self.observes(access) {
            // Stay below the sentinel so a pending entry never reads as "never".
            let ready = access.tick.saturating_add(self.latency).min(u64::MAX - 1);
            for predicted in self.predictor.predict(access) {
                self.stats.identified += 1;
                let candidate =
                    PrefetchCandidate::new(predicted.addr & self.line_mask, predicted.priority);
                if !same_page(candidate.addr, access.addr) {
                    self.stats.span_page += 1;
                }
                self.insert(candidate, ready);
            }
        }
        self.next_ready_time()
    }

    fn next_candidate(&mut self) -> Option<PrefetchCandidate> {
        let pending = self.queue.pop_front()?;
        self.stats.issued += 1;
        Some(pending.candidate)
    }

    fn next_ready_time(&self) -> DecisionTime {
        self.queue
            .front()
            .map_or(DecisionTime::NEVER, |p| DecisionTime::at(p.ready))
    }

    fn calculate_prefetch(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate> {
        self.predictor.predict(access)
    }

    fn stats(&self) -> PrefetchStats {
        self.stats
    }
}
