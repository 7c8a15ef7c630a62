//! Prefetch statistics.
//!
//! Counters kept by each queued prefetcher. A composite reports the sum over
//! its enabled strategies.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Counters describing how a prefetcher's predictions were handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefetchStats {
    /// Candidates produced by the strategy.
    pub identified: u64,
    /// Candidates dropped because the same line was already pending.
    pub buffer_hits: u64,
    /// Candidates squashed or rejected because the queue was full.
    pub removed_full: u64,
    /// Candidates handed to the cache.
    pub issued: u64,
    /// Candidates that cross into a different page than the triggering access.
    pub span_page: u64,
}

impl PrefetchStats {
    /// Fraction of identified candidates that were eventually issued.
    ///
    /// # Returns
    ///
    /// `issued / identified`, or `0.0` when nothing was identified.
    pub fn issue_ratio(&self) -> f64 {
        if self.identified == 0 {
            0.0
        } else {
            self.issued as f64 / self.identified as f64
        }
    }
}

impl AddAssign for PrefetchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.identified += rhs.identified;
        self.buffer_hits += rhs.buffer_hits;
        self.removed_full += rhs.removed_full;
        self.issued += rhs.issued;
        self.span_page += rhs.span_page;
    }
}

impl Add for PrefetchStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sum for PrefetchStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
