//! Set-Associative Cache Simulator.
//!
//! This module implements a small set-associative cache with LRU replacement
//! that drives a hardware prefetcher through its two-phase protocol:
//! 1. **Notify:** Every demand access is reported to the prefetcher, which
//!    answers with the tick of its next decision.
//! 2. **Issue:** Once the simulation reaches that tick, [`CacheSim::issue_prefetches`]
//!    pulls and installs candidates for as long as the prefetcher stays due.
//!
//! Any [`Prefetcher`] can be plugged in, including a composite of several strategies.

use tracing::trace;

use crate::common::{AccessType, DecisionTime, MemoryAccess, PrefetchError};
use crate::config::CacheConfig;
use crate::core::units::prefetch::{Prefetcher, build_prefetcher, line_size};

/// Cache line entry.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
    /// Installed by a prefetch and not yet touched by a demand access.
    prefetched: bool,
    /// LRU stamp; larger is more recent.
    last_used: u64,
}

/// Demand and prefetch counters for one cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Demand hits.
    pub hits: u64,
    /// Demand misses.
    pub misses: u64,
    /// Lines installed by prefetches.
    pub prefetch_fills: u64,
    /// Prefetch candidates dropped because the line was already present.
    pub prefetch_redundant: u64,
    /// Demand hits on lines that were brought in by a prefetch.
    pub prefetch_useful: u64,
    /// Dirty lines evicted (write-backs to the next level).
    pub writebacks: u64,
}

/// Cache simulator with an optional hardware prefetcher.
pub struct CacheSim {
    /// Access latency in cycles.
    pub latency: u64,
    /// When false, accesses bypass this cache and the prefetcher is never consulted.
    pub enabled: bool,
    prefetcher: Option<Box<dyn Prefetcher>>,
    /// Tick reported by the last prefetcher interaction.
    next_prefetch: DecisionTime,
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    line_bytes: u64,
    clock: u64,
    stats: CacheStats,
}

impl CacheSim {
    /// Creates a new cache simulator with the specified configuration.
    ///
    /// A zero size falls back to 4 KiB. A line size that is zero or not a
    /// power of two falls back to 64 bytes, for the cache and its prefetcher alike.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache configuration specifying size, associativity,
    ///   line size, and prefetcher.
    ///
    /// # Errors
    ///
    /// Returns a [`PrefetchError`] if the configured prefetcher cannot be built.
    pub fn new(config: &CacheConfig) -> Result<Self, PrefetchError> {
        let prefetcher = build_prefetcher(
            config.prefetcher,
            line_size(config.line_bytes),
            &config.prefetch,
            &config.composite,
        )?;
        Ok(Self::with_prefetcher(config, prefetcher))
    }

    /// Creates a cache that uses `prefetcher` instead of the configured one.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry and latency; its prefetcher fields are ignored.
    /// * `prefetcher` - The prefetcher to own, if any.
    pub fn with_prefetcher(config: &CacheConfig, prefetcher: Option<Box<dyn Prefetcher>>) -> Self {
        let ways = config.ways.max(1);
        let line_bytes = line_size(config.line_bytes) as usize;
        let size = if config.size_bytes == 0 {
            4096
        } else {
            config.size_bytes
        };
        let num_sets = (size / line_bytes / ways).max(1);

        Self {
            latency: config.latency,
            enabled: config.enabled,
            prefetcher,
            next_prefetch: DecisionTime::NEVER,
            lines: vec![CacheLine::default(); num_sets * ways],
            num_sets,
            ways,
            line_bytes: line_bytes as u64,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Returns the cache counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns the attached prefetcher, if any.
    pub fn prefetcher(&self) -> Option<&dyn Prefetcher> {
        self.prefetcher.as_deref()
    }

    /// Returns the tick at which the prefetcher next wants to issue.
    pub const fn next_prefetch_time(&self) -> DecisionTime {
        self.next_prefetch
    }

    fn set_and_tag(&self, addr: u64) -> (usize, u64) {
        let line = addr / self.line_bytes;
        ((line % self.num_sets as u64) as usize, line / self.num_sets as u64)
    }

    fn find(&self, addr: u64) -> Option<usize> {
        let (set, tag) = self.set_and_tag(addr);
        let base = set * self.ways;
        (base..base + self.ways).find(|&idx| self.lines[idx].valid && self.lines[idx].tag == tag)
    }

    /// Checks if the cache contains the specified address.
    pub fn contains(&self, addr: u64) -> bool {
        self.enabled && self.find(addr).is_some()
    }

    /// Installs a line, evicting the least recently used way of its set.
    fn install_line(&mut self, addr: u64, is_write: bool, prefetched: bool) {
        let (set, tag) = self.set_and_tag(addr);
        let base = set * self.ways;
        let victim = (base..base + self.ways)
            .find(|&idx| !self.lines[idx].valid)
            .or_else(|| (base..base + self.ways).min_by_key(|&idx| self.lines[idx].last_used))
            .unwrap_or(base);

        if self.lines[victim].valid && self.lines[victim].dirty {
            self.stats.writebacks += 1;
        }
        self.clock += 1;
        self.lines[victim] = CacheLine {
            tag,
            valid: true,
            dirty: is_write,
            prefetched,
            last_used: self.clock,
        };
    }

    /// Performs a demand access and reports it to the prefetcher.
    ///
    /// # Arguments
    ///
    /// * `addr` - The accessed address.
    /// * `kind` - Fetch, read or write.
    /// * `pc` - The issuing program counter, if known.
    /// * `now` - The current simulated tick.
    ///
    /// # Returns
    ///
    /// `true` on a hit. A disabled cache always reports a miss.
    pub fn access(&mut self, addr: u64, kind: AccessType, pc: Option<u64>, now: u64) -> bool {
        if !self.enabled {
            return false;
        }

        let is_write = kind == AccessType::Write;
        let hit = if let Some(idx) = self.find(addr) {
            self.clock += 1;
            let line = &mut self.lines[idx];
            line.last_used = self.clock;
            line.dirty |= is_write;
            if line.prefetched {
                line.prefetched = false;
                self.stats.prefetch_useful += 1;
            }
            self.stats.hits += 1;
            true
        } else {
            self.stats.misses += 1;
            self.install_line(addr, is_write, false);
            false
        };

        if let Some(pf) = self.prefetcher.as_mut() {
            let event = MemoryAccess {
                addr,
                pc,
                kind,
                hit,
                tick: now,
            };
            self.next_prefetch = pf.notify(&event);
        }

        hit
    }

    /// Drains prefetch candidates while the prefetcher's decision time is due.
    ///
    /// Readiness is judged on the time the prefetcher reports, not per
    /// candidate. A composite reports the earliest time across its strategies,
    /// so once any strategy is due its candidates are pulled in priority order,
    /// including those of strategies whose own time lies in the future.
    ///
    /// # Arguments
    ///
    /// * `now` - The current simulated tick.
    ///
    /// # Returns
    ///
    /// The number of lines installed.
    pub fn issue_prefetches(&mut self, now: u64) -> usize {
        if !self.enabled {
            return 0;
        }

        let mut installed = 0;
        while self.next_prefetch.is_due(now) {
            let Some(candidate) = self.prefetcher.as_mut().and_then(|pf| pf.next_candidate())
            else {
                break;
            };

            if self.find(candidate.addr).is_some() {
                self.stats.prefetch_redundant += 1;
            } else {
                trace!(addr = candidate.addr, now, "installing prefetch");
                self.install_line(candidate.addr, false, true);
                self.stats.prefetch_fills += 1;
                installed += 1;
            }

            self.next_prefetch = self
                .prefetcher
                .as_ref()
                .map_or(DecisionTime::NEVER, |pf| pf.next_ready_time());
        }
        installed
    }
}

impl std::fmt::Debug for CacheSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSim")
            .field("enabled", &self.enabled)
            .field("num_sets", &self.num_sets)
            .field("ways", &self.ways)
            .field("line_bytes", &self.line_bytes)
            .field("prefetcher", &self.prefetcher.as_ref().map(|pf| pf.name()))
            .field("next_prefetch", &self.next_prefetch)
            .finish_non_exhaustive()
    }
}
