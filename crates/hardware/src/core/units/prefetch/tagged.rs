//! Tagged Prefetcher.
//!
//! A prefetcher that attempts to reduce cache pollution by only
//! prefetching on demand misses or when a previously prefetched line is used.
//!
//! It keeps a small filter of addresses it has prefetched.
//! * If a **Miss** occurs: It assumes a new stream and prefetches the next line.
//! * If a **Hit** occurs: It checks if the hit address was previously prefetched.
//!   If yes (a "useful" prefetch), it extends the stream by prefetching the next line.
//!   If no (a standard hit), it stays idle to save bandwidth.

use super::{AddressPredictor, line_size};
use crate::common::{MemoryAccess, PrefetchCandidate};

/// Number of entries in the prefetched-line filter.
const FILTER_SIZE: usize = 64;

/// Tagged Prefetcher state.
#[derive(Debug)]
pub struct TaggedPrefetcher {
    /// Size of a cache line in bytes.
    line_bytes: u64,
    /// Number of lines to prefetch ahead.
    degree: usize,
    /// Addresses issued by this prefetcher.
    /// Stands in for the "tag" bit stored in the cache line metadata.
    prefetched_filter: Vec<Option<u64>>,
    /// Mask for indexing the filter.
    filter_mask: usize,
}

impl TaggedPrefetcher {
    /// Creates a new Tagged prefetcher.
    ///
    /// # Arguments
    ///
    /// * `line_bytes` - The size of a cache line in bytes.
    /// * `degree` - The number of lines to prefetch ahead.
    pub fn new(line_bytes: usize, degree: usize) -> Self {
        Self {
            line_bytes: line_size(line_bytes),
            degree: degree.max(1),
            prefetched_filter: vec![None; FILTER_SIZE],
            filter_mask: FILTER_SIZE - 1,
        }
    }

    fn slot(&self, addr: u64) -> usize {
        ((addr / self.line_bytes) as usize) & self.filter_mask
    }

    /// Checks if an address was recently prefetched.
    fn was_prefetched(&self, addr: u64) -> bool {
        self.prefetched_filter[self.slot(addr)] == Some(addr)
    }

    /// Marks an address as prefetched.
    fn mark_prefetched(&mut self, addr: u64) {
        let idx = self.slot(addr);
        self.prefetched_filter[idx] = Some(addr);
    }
}

impl AddressPredictor for TaggedPrefetcher {
    fn name(&self) -> &'static str {
        "tagged"
    }

    /// Hits on prefetched lines drive this strategy, so it must see them.
    fn requires_hits(&self) -> bool {
        true
    }

    /// Uses the `hit` status to determine if the stream should be extended.
    fn predict(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate> {
        let aligned = access.addr & !(self.line_bytes - 1);
        if access.hit && !self.was_prefetched(aligned) {
            return Vec::new();
        }

        let mut prefetches = Vec::with_capacity(self.degree);
        for k in 1..=self.degree as u64 {
            let target = aligned.wrapping_add(self.line_bytes * k);
            prefetches.push(PrefetchCandidate::new(target, 0));
            self.mark_prefetched(target);
        }
        prefetches
    }
}
