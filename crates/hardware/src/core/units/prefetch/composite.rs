//! Composite Prefetcher.
//!
//! Presents several independent prefetch strategies to the cache as a single
//! [`Prefetcher`]. The set of strategies, their enable flags and their order
//! are fixed at construction:
//! 1. **Notify:** Every enabled strategy observes the access. The composite
//!    answers with the earliest of their decision times.
//! 2. **Retrieve:** Enabled strategies are asked in priority (construction)
//!    order; the first candidate found is returned and lower-priority
//!    strategies are not touched for that call.
//! 3. **Ownership:** The composite owns every strategy handed to it, enabled
//!    or not, and releases each exactly once when dropped.
//!
//! Disabled strategies are never queried. A composite built with a strategy
//! disabled behaves exactly like one built without it.

use std::fmt;

use tracing::{debug, trace};

use super::{PrefetchStats, Prefetcher, build_strategy};
use crate::common::{DecisionTime, MemoryAccess, PrefetchCandidate, PrefetchError};
use crate::config::{CompositeConfig, PrefetchConfig, Prefetcher as PrefetcherKind};

/// One strategy offered to a [`CompositePrefetcher`] at construction.
pub struct StrategySlot {
    kind: PrefetcherKind,
    enabled: bool,
    strategy: Option<Box<dyn Prefetcher>>,
}

impl StrategySlot {
    /// Creates a slot from its raw parts.
    ///
    /// # Arguments
    ///
    /// * `kind` - Strategy kind, used for logging and error reporting.
    /// * `enabled` - Whether the composite should consult this strategy.
    /// * `strategy` - The instance to hand over, if any.
    pub fn new(kind: PrefetcherKind, enabled: bool, strategy: Option<Box<dyn Prefetcher>>) -> Self {
        Self {
            kind,
            enabled,
            strategy,
        }
    }

    /// Creates an enabled slot owning `strategy`.
    pub fn enabled(kind: PrefetcherKind, strategy: Box<dyn Prefetcher>) -> Self {
        Self::new(kind, true, Some(strategy))
    }

    /// Creates a disabled slot, optionally still owning an instance.
    pub fn disabled(kind: PrefetcherKind, strategy: Option<Box<dyn Prefetcher>>) -> Self {
        Self::new(kind, false, strategy)
    }
}

impl fmt::Debug for StrategySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategySlot")
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("has_instance", &self.strategy.is_some())
            .finish()
    }
}

/// An enabled strategy, in priority order.
struct ActiveStrategy {
    kind: PrefetcherKind,
    strategy: Box<dyn Prefetcher>,
}

/// Composite prefetcher state.
pub struct CompositePrefetcher {
    /// Enabled strategies in priority order.
    active: Vec<ActiveStrategy>,
    /// Instances supplied for disabled slots. Held only so they are released
    /// together with the composite; never queried.
    dormant: Vec<(PrefetcherKind, Box<dyn Prefetcher>)>,
}

impl CompositePrefetcher {
    /// Creates a composite from an ordered list of slots.
    ///
    /// Slot order is the priority order used by [`Prefetcher::next_candidate`].
    ///
    /// # Arguments
    ///
    /// * `slots` - Strategies in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`PrefetchError::MissingStrategy`] if an enabled slot carries no
    /// instance. Every instance already handed over is dropped on that path.
    pub fn new<I>(slots: I) -> Result<Self, PrefetchError>
    where
        I: IntoIterator<Item = StrategySlot>,
    {
        let mut active = Vec::new();
        let mut dormant = Vec::new();

        for slot in slots {
            match (slot.enabled, slot.strategy) {
                (true, Some(strategy)) => active.push(ActiveStrategy {
                    kind: slot.kind,
                    strategy,
                }),
                (true, None) => return Err(PrefetchError::MissingStrategy { kind: slot.kind }),
                (false, Some(strategy)) => {
                    debug!(kind = ?slot.kind, "holding instance for disabled strategy");
                    dormant.push((slot.kind, strategy));
                }
                (false, None) => {}
            }
        }

        let composite = Self { active, dormant };
        debug!(
            enabled = ?composite.enabled_kinds(),
            dormant = composite.dormant.len(),
            "composite prefetcher built"
        );
        Ok(composite)
    }

    /// Builds a composite from configuration.
    ///
    /// One queued strategy is constructed per enabled entry; disabled entries
    /// get no instance.
    ///
    /// # Arguments
    ///
    /// * `config` - Strategy list in priority order.
    /// * `params` - Parameters shared by every strategy.
    /// * `line_bytes` - Cache line size in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PrefetchError::InvalidConfig`] if an entry names `None` or
    /// `Composite`, or if a strategy cannot be built.
    pub fn from_config(
        config: &CompositeConfig,
        params: &PrefetchConfig,
        line_bytes: u64,
    ) -> Result<Self, PrefetchError> {
        let mut slots = Vec::with_capacity(config.strategies.len());
        for entry in &config.strategies {
            if !entry.kind.is_leaf() {
                return Err(PrefetchError::invalid_config(format!(
                    "composite cannot contain {:?}",
                    entry.kind
                )));
            }
            let strategy = if entry.enabled {
                Some(build_strategy(entry.kind, line_bytes, params)?)
            } else {
                None
            };
            slots.push(StrategySlot::new(entry.kind, entry.enabled, strategy));
        }
        Self::new(slots)
    }

    /// Returns the kinds of enabled strategies in priority order.
    pub fn enabled_kinds(&self) -> Vec<PrefetcherKind> {
        self.active.iter().map(|a| a.kind).collect()
    }

    /// Returns the number of strategy instances owned, enabled or not.
    pub fn owned_count(&self) -> usize {
        self.active.len() + self.dormant.len()
    }
}

impl Prefetcher for CompositePrefetcher {
    fn name(&self) -> &'static str {
        "composite"
    }

    /// Forwards the access to every enabled strategy and fuses their answers.
    ///
    /// The result is the minimum reported time, or [`DecisionTime::NEVER`]
    /// when no strategy is enabled. It does not depend on strategy order.
    fn notify(&mut self, access: &MemoryAccess) -> DecisionTime {
        let fused =
            DecisionTime::earliest(self.active.iter_mut().map(|a| a.strategy.notify(access)));
        trace!(addr = access.addr, tick = access.tick, %fused, "composite notify");
        fused
    }

    /// Returns the first candidate offered by an enabled strategy, scanning in
    /// priority order. Strategies after the one that answered are not asked.
    fn next_candidate(&mut self) -> Option<PrefetchCandidate> {
        for a in &mut self.active {
            if let Some(candidate) = a.strategy.next_candidate() {
                trace!(
                    strategy = a.strategy.name(),
                    addr = candidate.addr,
                    "composite candidate"
                );
                return Some(candidate);
            }
        }
        None
    }

    fn next_ready_time(&self) -> DecisionTime {
        DecisionTime::earliest(self.active.iter().map(|a| a.strategy.next_ready_time()))
    }

    /// Direct prediction is not part of the composite's contract.
    ///
    /// # Panics
    ///
    /// Always. Callers must go through [`Prefetcher::notify`] and
    /// [`Prefetcher::next_candidate`].
    fn calculate_prefetch(&mut self, _access: &MemoryAccess) -> Vec<PrefetchCandidate> {
        panic!(
            "CompositePrefetcher::calculate_prefetch called; \
             use notify() followed by next_candidate()"
        );
    }

    fn stats(&self) -> PrefetchStats {
        self.active.iter().map(|a| a.strategy.stats()).sum()
    }
}

impl fmt::Debug for CompositePrefetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dormant: Vec<_> = self.dormant.iter().map(|(kind, _)| *kind).collect();
        f.debug_struct("CompositePrefetcher")
            .field("enabled", &self.enabled_kinds())
            .field("dormant", &dormant)
            .finish()
    }
}
