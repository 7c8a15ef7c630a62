//! Stride Prefetcher.
//!
//! A prefetcher that detects constant stride patterns in memory accesses.
//! It maintains a Reference Prediction Table (RPT) tracking the last address
//! and stride of each access stream. Streams are keyed by the issuing PC when
//! the access carries one, and by the line address otherwise.
//!
//! Prefetching is triggered only when a stable stride pattern is established
//! (confidence threshold is met).
//!
//! # Performance
//!
//! - **Time Complexity:** O(D) per access where D is the prefetch degree
//! - **Space Complexity:** O(T) where T is the table size (typically 64-256 entries)
//! - **Best Case:** Regular strided patterns (array traversals, matrix operations)
//! - **Worst Case:** Irregular or random access patterns (linked lists, hash tables)

use super::{AddressPredictor, line_size};
use crate::common::{MemoryAccess, PrefetchCandidate};

/// Saturation point of the 2-bit confidence counter.
const MAX_CONFIDENCE: u8 = 3;

/// Entry in the Reference Prediction Table.
#[derive(Default, Clone, Copy, Debug)]
struct StreamEntry {
    /// The last address accessed by this stream.
    last_addr: u64,
    /// The detected stride (difference between consecutive accesses).
    stride: i64,
    /// Confidence counter (2-bit saturating).
    confidence: u8,
}

/// Stride Prefetcher state.
#[derive(Debug)]
pub struct StridePrefetcher {
    /// Reference Prediction Table.
    table: Vec<StreamEntry>,
    /// Size of a cache line in bytes.
    line_bytes: u64,
    /// Mask used to index the table.
    table_mask: usize,
    /// Number of strides to prefetch ahead.
    degree: usize,
}

impl StridePrefetcher {
    /// Creates a new Stride prefetcher.
    ///
    /// # Arguments
    ///
    /// * `line_bytes` - The size of a cache line in bytes.
    /// * `table_size` - Number of entries in the tracking table (power of 2, else 64).
    /// * `degree` - The number of strides to prefetch ahead.
    pub fn new(line_bytes: usize, table_size: usize, degree: usize) -> Self {
        let safe_size = if table_size.is_power_of_two() {
            table_size
        } else {
            64
        };

        Self {
            table: vec![StreamEntry::default(); safe_size],
            line_bytes: line_size(line_bytes),
            table_mask: safe_size - 1,
            degree: degree.max(1),
        }
    }

    fn index(&self, access: &MemoryAccess) -> usize {
        let line_shift = self.line_bytes.trailing_zeros();
        let key = access.pc.map_or(access.addr >> line_shift, |pc| pc >> 2);
        (key as usize) & self.table_mask
    }
}

impl AddressPredictor for StridePrefetcher {
    fn name(&self) -> &'static str {
        "stride"
    }

    /// Updates the tracking table with the current address. Once the same
    /// stride has been seen with saturated confidence, emits `degree`
    /// addresses following that stride.
    fn predict(&mut self, access: &MemoryAccess) -> Vec<PrefetchCandidate> {
        let idx = self.index(access);
        let line_mask = !(self.line_bytes - 1);
        let degree = self.degree;
        let entry = &mut self.table[idx];

        let addr = access.addr;
        let current_stride = addr.wrapping_sub(entry.last_addr) as i64;
        let mut prefetches = Vec::new();

        if current_stride == entry.stride {
            if entry.confidence < MAX_CONFIDENCE {
                entry.confidence += 1;
            } else {
                for k in 1..=degree as i64 {
                    let target = addr.wrapping_add(entry.stride.wrapping_mul(k) as u64);
                    prefetches.push(PrefetchCandidate::new(target & line_mask, 0));
                }
            }
        } else if entry.confidence > 0 {
            entry.confidence -= 1;
        } else {
            entry.stride = current_stride;
        }

        entry.last_addr = addr;
        prefetches
    }
}
