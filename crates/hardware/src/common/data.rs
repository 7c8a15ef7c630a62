//! Memory Access Types.
//!
//! This module defines the values exchanged between a cache and its prefetchers.
//! These types are used for the following:
//! 1. **Access Events:** Describing each demand access a prefetcher observes.
//! 2. **Prefetch Candidates:** Describing each address a prefetcher proposes.
//! 3. **Statistics Tracking:** Categorizing memory operations for performance analysis.

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches, data loads, and data stores
/// so a prefetcher can decide which streams it trains on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Instruction fetch access.
    Fetch,

    /// Data read access.
    #[default]
    Read,

    /// Data write access.
    Write,
}

/// A demand access observed by the cache and forwarded to its prefetcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryAccess {
    /// Accessed byte address.
    pub addr: u64,
    /// Program counter of the instruction that issued the access, if known.
    pub pc: Option<u64>,
    /// Fetch, read or write.
    pub kind: AccessType,
    /// Whether the access hit in the cache that observed it.
    pub hit: bool,
    /// Simulated tick at which the access was observed.
    pub tick: u64,
}

impl MemoryAccess {
    /// Creates a data read that missed at `tick`.
    ///
    /// # Arguments
    ///
    /// * `addr` - The accessed byte address.
    /// * `tick` - The simulated tick of the access.
    ///
    /// # Returns
    ///
    /// A `MemoryAccess` with no PC, kind `Read` and `hit == false`.
    pub const fn miss(addr: u64, tick: u64) -> Self {
        Self {
            addr,
            pc: None,
            kind: AccessType::Read,
            hit: false,
            tick,
        }
    }

    /// Creates a data read that hit at `tick`.
    pub const fn hit(addr: u64, tick: u64) -> Self {
        Self {
            addr,
            pc: None,
            kind: AccessType::Read,
            hit: true,
            tick,
        }
    }

    /// Attaches the issuing program counter.
    #[must_use]
    pub const fn with_pc(mut self, pc: u64) -> Self {
        self.pc = Some(pc);
        self
    }

    /// Overrides the access kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: AccessType) -> Self {
        self.kind = kind;
        self
    }
}

/// An address a prefetcher proposes to fetch ahead of demand.
///
/// Higher `priority` values are issued first by the queued base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PrefetchCandidate {
    /// Target byte address (line-aligned once queued).
    pub addr: u64,
    /// Issue priority; larger is more urgent.
    pub priority: i32,
}

impl PrefetchCandidate {
    /// Creates a candidate with the given priority.
    pub const fn new(addr: u64, priority: i32) -> Self {
        Self { addr, priority }
    }
}
