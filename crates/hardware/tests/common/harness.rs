use rvsim_prefetch::common::{MemoryAccess, PrefetchCandidate};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent otherwise.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A read miss at tick 0.
pub fn miss(addr: u64) -> MemoryAccess {
    MemoryAccess::miss(addr, 0)
}

/// A read hit at tick 0.
pub fn hit(addr: u64) -> MemoryAccess {
    MemoryAccess::hit(addr, 0)
}

/// Extracts candidate addresses, preserving order.
pub fn addrs(candidates: &[PrefetchCandidate]) -> Vec<u64> {
    candidates.iter().map(|c| c.addr).collect()
}
