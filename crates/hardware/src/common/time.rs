//! Simulated decision time.
//!
//! This module defines the timestamp type exchanged between the cache and its
//! prefetchers. It provides the following:
//! 1. **Type Safety:** Separates decision ticks from addresses and cycle counts.
//! 2. **Sentinel:** A distinguished [`DecisionTime::NEVER`] value meaning "no pending decision".
//! 3. **Fusion:** An order-independent minimum over any number of reported times.

use std::fmt;

/// Simulated tick at which a prefetcher next wants to be asked for a candidate.
///
/// The type is totally ordered. [`DecisionTime::NEVER`] is the largest
/// representable value, so taking a minimum over several reports only
/// yields the sentinel when every report is the sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecisionTime(pub u64);

impl DecisionTime {
    /// Sentinel for "no pending decision".
    pub const NEVER: Self = Self(u64::MAX);

    /// Creates a decision time from a raw tick value.
    ///
    /// # Arguments
    ///
    /// * `tick` - The simulated tick.
    ///
    /// # Returns
    ///
    /// A new `DecisionTime` wrapping the tick.
    #[inline(always)]
    pub const fn at(tick: u64) -> Self {
        Self(tick)
    }

    /// Returns the raw tick value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the "no pending decision" sentinel.
    #[inline(always)]
    pub const fn is_never(self) -> bool {
        self.0 == u64::MAX
    }

    /// Returns `true` if a decision is pending at or before `now`.
    #[inline(always)]
    pub const fn is_due(self, now: u64) -> bool {
        !self.is_never() && self.0 <= now
    }

    /// Fuses any number of decision times into the earliest one.
    ///
    /// The result depends only on the multiset of inputs, never on their
    /// order. An empty input yields [`DecisionTime::NEVER`].
    ///
    /// # Arguments
    ///
    /// * `times` - Reported decision times.
    ///
    /// # Returns
    ///
    /// The minimum of `times`, or the sentinel when `times` is empty.
    pub fn earliest<I>(times: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        times.into_iter().min().unwrap_or(Self::NEVER)
    }
}

impl Default for DecisionTime {
    fn default() -> Self {
        Self::NEVER
    }
}

impl fmt::Display for DecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            write!(f, "never")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
