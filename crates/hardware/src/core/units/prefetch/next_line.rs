//! Next-Line Prefetcher.
//!
//! A simple spatial prefetcher that fetches the next sequential cache line(s)
//! whenever a cache access occurs. This exploits the spatial locality common
//! in instruction streams and sequential data arrays.

use super::{AddressPredictor, line_size};
use crate::common::{MemoryAccess, PrefetchCandidate};

/// Next-Line Prefetcher state.
#[derive(Debug)]
pub struct NextLinePrefetcher {
    /// Size of a cache line in bytes.
    line_bytes: u64,
    /// Number of subsequent lines to prefetch (prefetch degree).
    degree: usize,
}

impl NextLinePrefetcher {
    /// Creates a new Next-Line prefetcher.
    ///
    /// # Arguments
    ///
    /// * `line_bytes` - The size of a cache line in bytes.
    /// * `degree` - The number of lines to prefetch ahead.
    pub fn new(line_bytes: usize, degree: usize) -> Self {
        Self {
            line_bytes: line_size(line_bytes),
            degree: degree.max(1),
        }
    }
}

impl AddressPredictor for NextLinePrefetcher {
    fn name(&self) -> &'static str {
        "next-line"
    }

    /// Calculates the addresses of the next `degree` cache lines following
    /// the accessed address. Hit status is ignored.
    fn predict(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate> {
        let base = access.addr & !(self.line_bytes - 1);
        (1..=self.degree as u64)
            .map(|k| PrefetchCandidate::new(base.wrapping_add(self.line_bytes * k), 0))
            .collect()
    }
}
