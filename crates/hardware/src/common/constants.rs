//! Global Memory Constants.
//!
//! This module defines constants shared by the cache and prefetch units. It includes:
//! 1. **Memory Constants:** Page sizes and shifts used for page-crossing checks.
//! 2. **Line Constants:** The fallback cache line size when configuration supplies none.

/// Page size in bytes (4KB).
pub const PAGE_SIZE: u64 = 4096;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u64 = 12;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u64 = PAGE_SIZE - 1;

/// Cache line size used when a configuration supplies zero or a non-power-of-two.
pub const FALLBACK_LINE_BYTES: u64 = 64;

/// Returns `true` when both addresses fall in the same 4KB page.
#[inline(always)]
pub const fn same_page(a: u64, b: u64) -> bool {
    (a >> PAGE_SHIFT) == (b >> PAGE_SHIFT)
}
