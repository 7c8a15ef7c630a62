//! Next-Line Prefetcher Tests.
//!
//! Verifies that the next-line predictor emits the correct number of
//! sequential, line-aligned prefetch addresses on every access.

use crate::common::harness::{addrs, hit, miss};
use rvsim_prefetch::core::units::prefetch::{AddressPredictor, NextLinePrefetcher};

// ══════════════════════════════════════════════════════════
// 1. Basic operation
// ══════════════════════════════════════════════════════════

/// Degree-1 predictor emits exactly one address: the next cache line.
#[test]
fn degree_1_emits_one_next_line() {
    let mut pf = NextLinePrefetcher::new(64, 1);
    assert_eq!(addrs(&pf.predict(&miss(0x1000))), vec![0x1040]);
}

/// Degree-4 predictor emits four sequential lines, all at priority 0.
#[test]
fn degree_4_emits_four_lines() {
    let mut pf = NextLinePrefetcher::new(64, 4);
    let out = pf.predict(&hit(0x2000));
    assert_eq!(addrs(&out), vec![0x2040, 0x2080, 0x20C0, 0x2100]);
    assert!(out.iter().all(|c| c.priority == 0));
}

// ══════════════════════════════════════════════════════════
// 2. Alignment and line sizes
// ══════════════════════════════════════════════════════════

/// Access within a line is aligned down before computing the next line.
#[test]
fn mid_line_access_aligns_down() {
    let mut pf = NextLinePrefetcher::new(64, 1);
    assert_eq!(addrs(&pf.predict(&miss(0x1037))), vec![0x1040]);
}

/// 128-byte lines produce 128-byte-spaced prefetches.
#[test]
fn line_size_128() {
    let mut pf = NextLinePrefetcher::new(128, 2);
    assert_eq!(addrs(&pf.predict(&miss(0x1000))), vec![0x1080, 0x1100]);
}

/// A zero line size falls back to 64 bytes instead of underflowing.
#[test]
fn zero_line_size_falls_back() {
    let mut pf = NextLinePrefetcher::new(0, 1);
    assert_eq!(addrs(&pf.predict(&miss(0x1000))), vec![0x1040]);
}

// ══════════════════════════════════════════════════════════
// 3. Hit/Miss independence
// ══════════════════════════════════════════════════════════

/// Next-line does not differentiate between hits and misses.
#[test]
fn hit_and_miss_produce_same_result() {
    let mut a = NextLinePrefetcher::new(64, 1);
    let mut b = NextLinePrefetcher::new(64, 1);
    assert_eq!(a.predict(&hit(0x3000)), b.predict(&miss(0x3000)));
}

/// Degree 0 is clamped to 1.
#[test]
fn degree_zero_defaults_to_one() {
    let mut pf = NextLinePrefetcher::new(64, 0);
    assert_eq!(pf.predict(&miss(0x1000)).len(), 1);
}
