//! Stream Prefetcher Tests.
//!
//! Verifies detection of ascending/descending sequential streams.
//! The stream predictor targets one-line strides and requires two
//! consecutive confirmations before prefetching.

use crate::common::harness::{addrs, miss};
use rvsim_prefetch::core::units::prefetch::{AddressPredictor, StreamPrefetcher};

const LINE: u64 = 64;

/// First access and a single confirmation never prefetch.
#[test]
fn cold_stream_is_silent() {
    let mut pf = StreamPrefetcher::new(64, 1);
    assert!(pf.predict(&miss(0x1000)).is_empty());
    assert!(pf.predict(&miss(0x1000 + LINE)).is_empty());
}

/// Three consecutive ascending lines lock the stream.
#[test]
fn ascending_stream_triggers_prefetch() {
    let mut pf = StreamPrefetcher::new(64, 2);
    pf.predict(&miss(0x2000));
    pf.predict(&miss(0x2000 + LINE));
    assert_eq!(
        addrs(&pf.predict(&miss(0x2000 + 2 * LINE))),
        vec![0x2000 + 3 * LINE, 0x2000 + 4 * LINE]
    );
}

/// Descending sequential accesses trigger backward prefetching.
#[test]
fn descending_stream_triggers_prefetch() {
    let mut pf = StreamPrefetcher::new(64, 1);
    pf.predict(&miss(0x2000));
    pf.predict(&miss(0x2000 - LINE));
    assert_eq!(
        addrs(&pf.predict(&miss(0x2000 - 2 * LINE))),
        vec![0x2000 - 3 * LINE]
    );
}

/// A non-sequential access decays confidence instead of prefetching.
#[test]
fn non_sequential_decays_confidence() {
    let mut pf = StreamPrefetcher::new(64, 1);
    pf.predict(&miss(0x1000));
    pf.predict(&miss(0x1000 + LINE));
    assert!(pf.predict(&miss(0x5000)).is_empty());
}

/// After a direction switch, the new direction must rebuild confidence.
#[test]
fn direction_switch_resets_confidence() {
    let mut pf = StreamPrefetcher::new(64, 1);
    let top = 0x1000 + 2 * LINE;
    pf.predict(&miss(0x1000));
    pf.predict(&miss(0x1000 + LINE));
    pf.predict(&miss(top));

    assert!(pf.predict(&miss(top - LINE)).is_empty());
    assert_eq!(addrs(&pf.predict(&miss(top - 2 * LINE))), vec![top - 3 * LINE]);
}
