//! Queued Prefetcher Tests.
//!
//! Verifies the queue every strategy sits behind: ready ticks, alignment,
//! miss-only filtering, duplicate filtering and statistics.

use crate::common::harness::{hit, miss};
use pretty_assertions::assert_eq;
use rvsim_prefetch::common::{DecisionTime, MemoryAccess};
use rvsim_prefetch::config::PrefetchConfig;
use rvsim_prefetch::core::units::prefetch::{
    AddressPredictor, NextLinePrefetcher, PrefetchStats, Prefetcher, QueuedPrefetcher,
    TaggedPrefetcher,
};

fn params(latency: u64) -> PrefetchConfig {
    PrefetchConfig {
        latency,
        ..PrefetchConfig::default()
    }
}

// ══════════════════════════════════════════════════════════
// 1. Decision time
// ══════════════════════════════════════════════════════════

/// An empty queue reports the sentinel.
#[test]
fn empty_queue_reports_never() {
    let pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 1), 64, &params(1));
    assert_eq!(pf.next_ready_time(), DecisionTime::NEVER);
}

/// Candidates become ready `latency` ticks after the triggering access.
#[test]
fn ready_time_is_access_tick_plus_latency() {
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 1), 64, &params(4));
    let t = pf.notify(&MemoryAccess::miss(0x1000, 10));
    assert_eq!(t, DecisionTime::at(14));
    assert_eq!(pf.next_ready_time(), DecisionTime::at(14));
}

/// Draining the queue returns the time to the sentinel.
#[test]
fn drained_queue_reports_never_again() {
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 1), 64, &params(1));
    pf.notify(&miss(0x1000));
    assert_eq!(pf.next_candidate().map(|c| c.addr), Some(0x1040));
    assert_eq!(pf.next_candidate(), None);
    assert!(pf.next_ready_time().is_never());
}

// ══════════════════════════════════════════════════════════
// 2. Filtering
// ══════════════════════════════════════════════════════════

/// In miss-only mode, hits do not train a strategy that does not need them.
#[test]
fn miss_only_ignores_hits() {
    let cfg = PrefetchConfig {
        on_miss_only: true,
        ..PrefetchConfig::default()
    };
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 1), 64, &cfg);
    assert!(pf.notify(&hit(0x1000)).is_never());
    assert_eq!(pf.pending(), 0);
}

/// The tagged strategy still sees hits in miss-only mode.
#[test]
fn miss_only_still_forwards_hits_to_tagged() {
    let cfg = PrefetchConfig {
        on_miss_only: true,
        ..PrefetchConfig::default()
    };
    let mut pf = QueuedPrefetcher::new(TaggedPrefetcher::new(64, 1), 64, &cfg);
    pf.notify(&miss(0x1000));
    assert_eq!(pf.next_candidate().map(|c| c.addr), Some(0x1040));
    pf.notify(&hit(0x1040));
    assert_eq!(pf.next_candidate().map(|c| c.addr), Some(0x1080));
}

/// A line that is already pending is not queued twice.
#[test]
fn duplicate_lines_are_filtered() {
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 1), 64, &params(1));
    pf.notify(&miss(0x1000));
    pf.notify(&miss(0x1010));
    assert_eq!(pf.pending(), 1);
    assert_eq!(pf.stats().buffer_hits, 1);
}

/// A bounded queue squashes once full.
#[test]
fn full_queue_counts_removals() {
    let cfg = PrefetchConfig {
        queue_size: 2,
        degree: 3,
        ..PrefetchConfig::default()
    };
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 3), 64, &cfg);
    pf.notify(&miss(0x1000));
    assert_eq!(pf.pending(), 2);
    assert_eq!(pf.stats().removed_full, 1);
    // Equal priorities: the oldest entry made room for the newest.
    assert_eq!(pf.next_candidate().map(|c| c.addr), Some(0x1080));
    assert_eq!(pf.next_candidate().map(|c| c.addr), Some(0x10C0));
}

// ══════════════════════════════════════════════════════════
// 3. Statistics and direct prediction
// ══════════════════════════════════════════════════════════

/// Counters track identification, page crossings and issue.
#[test]
fn stats_track_lifecycle() {
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 2), 64, &params(1));
    // Last line of a page: both targets cross into the next page.
    pf.notify(&miss(0x1FC0));
    pf.next_candidate();

    assert_eq!(
        pf.stats(),
        PrefetchStats {
            identified: 2,
            buffer_hits: 0,
            removed_full: 0,
            issued: 1,
            span_page: 2,
        }
    );
}

/// Direct prediction bypasses the queue entirely.
#[test]
fn calculate_prefetch_does_not_queue() {
    let mut pf = QueuedPrefetcher::new(NextLinePrefetcher::new(64, 1), 64, &params(1));
    let direct = pf.calculate_prefetch(&miss(0x1000));
    assert_eq!(direct.len(), 1);
    assert_eq!(pf.pending(), 0);
    assert_eq!(pf.stats(), PrefetchStats::default());
}

/// The queue reports the wrapped strategy's name.
#[test]
fn name_comes_from_predictor() {
    let pf = QueuedPrefetcher::new(TaggedPrefetcher::new(64, 1), 64, &params(1));
    assert_eq!(pf.name(), "tagged");
}

/// The wrapped strategy stays reachable for inspection.
#[test]
fn predictor_exposes_wrapped_strategy() {
    let pf = QueuedPrefetcher::new(TaggedPrefetcher::new(64, 1), 64, &params(1));
    assert_eq!(pf.predictor().name(), "tagged");
    assert!(pf.predictor().requires_hits());
}
