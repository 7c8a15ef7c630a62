//! Stream Prefetcher.
//!
//! A prefetcher designed to detect and lock onto sequential access streams.
//! Unlike the Stride prefetcher which looks for arbitrary deltas, the Stream
//! prefetcher specifically optimizes for contiguous forward or backward
//! memory access patterns (stride +1 or -1 cache lines).
//!
//! It remembers the last access to determine direction. Once a direction is
//! established with enough confidence, it prefetches multiple lines ahead.

use super::{AddressPredictor, line_size};
use crate::common::{MemoryAccess, PrefetchCandidate};

/// Direction of the memory stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// No stable direction detected.
    None,
    /// Ascending memory addresses.
    Ascending,
    /// Descending memory addresses.
    Descending,
}

/// Confidence needed before the stream issues prefetches.
const LOCK_CONFIDENCE: u8 = 2;

/// Saturation point of the confidence counter.
const MAX_CONFIDENCE: u8 = 3;

/// Stream Prefetcher state.
#[derive(Debug)]
pub struct StreamPrefetcher {
    /// Size of a cache line in bytes.
    line_bytes: u64,
    /// Number of lines to prefetch ahead.
    degree: usize,
    /// The previously observed address.
    last_addr: u64,
    /// The current detected stream direction.
    direction: Direction,
    /// Confidence counter for the current stream.
    confidence: u8,
}

impl StreamPrefetcher {
    /// Creates a new Stream prefetcher.
    ///
    /// # Arguments
    ///
    /// * `line_bytes` - The size of a cache line in bytes.
    /// * `degree` - The number of lines to prefetch ahead.
    pub fn new(line_bytes: usize, degree: usize) -> Self {
        Self {
            line_bytes: line_size(line_bytes),
            degree: degree.max(1),
            last_addr: 0,
            direction: Direction::None,
            confidence: 0,
        }
    }

    fn train(&mut self, addr: u64) {
        let diff = addr.wrapping_sub(self.last_addr) as i64;
        let line = self.line_bytes as i64;

        let current = if diff == line {
            Direction::Ascending
        } else if diff == -line {
            Direction::Descending
        } else {
            Direction::None
        };

        if current == Direction::None {
            if self.confidence > 0 {
                self.confidence -= 1;
            } else {
                self.direction = Direction::None;
            }
        } else if current == self.direction {
            self.confidence = (self.confidence + 1).min(MAX_CONFIDENCE);
        } else {
            self.direction = current;
            self.confidence = 1;
        }
    }
}

impl AddressPredictor for StreamPrefetcher {
    fn name(&self) -> &'static str {
        "stream"
    }

    /// Compares the current address with the previous one to determine
    /// linearity. Once the stream is locked, emits `degree` lines in its
    /// direction.
    fn predict(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate> {
        self.train(access.addr);
        self.last_addr = access.addr;

        if self.confidence < LOCK_CONFIDENCE || self.direction == Direction::None {
            return Vec::new();
        }

        let base = access.addr & !(self.line_bytes - 1);
        (1..=self.degree as u64)
            .map(|k| {
                let offset = self.line_bytes * k;
                let target = if self.direction == Direction::Ascending {
                    base.wrapping_add(offset)
                } else {
                    base.wrapping_sub(offset)
                };
                PrefetchCandidate::new(target, 0)
            })
            .collect()
    }
}
