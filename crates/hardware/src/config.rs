//! Configuration system for the cache prefetch units.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a cache and its prefetcher. It provides:
//! 1. **Defaults:** Baseline cache and prefetch constants.
//! 2. **Structures:** Hierarchical config for the cache, shared prefetch parameters,
//!    and the composite strategy list.
//! 3. **Enums:** Prefetcher kinds.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::PrefetchError;

/// Default configuration constants.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in the JSON configuration.
mod defaults {
    /// Default cache size in bytes (4 KiB).
    pub const CACHE_SIZE: usize = 4096;

    /// Default cache line size in bytes (64 bytes).
    pub const CACHE_LINE: usize = 64;

    /// Default cache associativity (1 way = direct-mapped).
    pub const CACHE_WAYS: usize = 1;

    /// Default cache access latency in cycles.
    pub const CACHE_LATENCY: u64 = 1;

    /// Default prefetcher pattern table size (64 entries).
    pub const PREFETCH_TABLE_SIZE: usize = 64;

    /// Default prefetch degree (1 line per trigger).
    pub const PREFETCH_DEGREE: usize = 1;

    /// Default number of pending prefetches a queued prefetcher holds.
    pub const PREFETCH_QUEUE_SIZE: usize = 32;

    /// Default delay between observing an access and a candidate becoming ready.
    pub const PREFETCH_LATENCY: u64 = 1;
}

/// Hardware prefetcher kinds.
///
/// Prefetchers predict future memory accesses and fetch data
/// into the cache before it is needed to reduce miss penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Prefetcher {
    /// No prefetching enabled.
    #[default]
    None,
    /// Next-line prefetcher.
    ///
    /// Prefetches the next sequential cache line after each access.
    NextLine,
    /// Stride prefetcher.
    ///
    /// Detects stride patterns in memory accesses and prefetches
    /// addresses following the detected stride.
    Stride,
    /// Stream prefetcher.
    ///
    /// Detects sequential stream direction (ascending/descending) and
    /// prefetches multiple lines ahead.
    Stream,
    /// Tagged prefetcher.
    ///
    /// Prefetches on demand misses and on hits to previously prefetched lines.
    Tagged,
    /// Composite prefetcher.
    ///
    /// Aggregates the strategies listed in [`CompositeConfig`] behind one interface.
    Composite,
}

impl Prefetcher {
    /// Returns `true` for kinds that can be placed inside a composite.
    pub const fn is_leaf(self) -> bool {
        !matches!(self, Self::None | Self::Composite)
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use rvsim_prefetch::config::{Config, Prefetcher};
///
/// let config = Config::default();
/// assert!(!config.cache.enabled);
/// assert_eq!(config.cache.prefetcher, Prefetcher::None);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use rvsim_prefetch::config::{Config, Prefetcher};
///
/// let json = r#"{
///     "cache": {
///         "enabled": true,
///         "size_bytes": 32768,
///         "ways": 4,
///         "prefetcher": "Composite",
///         "prefetch": { "degree": 2, "latency": 3 },
///         "composite": {
///             "strategies": [
///                 { "kind": "Stride", "enabled": true },
///                 { "kind": "Tagged", "enabled": false }
///             ]
///         }
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.prefetcher, Prefetcher::Composite);
/// assert_eq!(config.cache.prefetch.degree, 2);
/// assert_eq!(config.cache.prefetch.queue_size, 32);
/// assert!(!config.cache.composite.strategies[1].enabled);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache and prefetcher configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON document.
    ///
    /// # Returns
    ///
    /// The parsed configuration with defaults applied to omitted fields.
    ///
    /// # Errors
    ///
    /// Returns [`PrefetchError::Parse`] if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, PrefetchError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Enable this cache level
    #[serde(default)]
    pub enabled: bool,

    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Access latency in cycles
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,

    /// Hardware prefetcher kind
    #[serde(default)]
    pub prefetcher: Prefetcher,

    /// Parameters shared by every prefetch strategy
    #[serde(default)]
    pub prefetch: PrefetchConfig,

    /// Strategy list used when `prefetcher` is `Composite`
    #[serde(default)]
    pub composite: CompositeConfig,
}

impl CacheConfig {
    /// Returns the default cache size in bytes.
    fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default cache associativity (number of ways).
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default cache access latency in cycles.
    fn default_latency() -> u64 {
        defaults::CACHE_LATENCY
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration.
    ///
    /// Cache is disabled by default, uses direct-mapped associativity,
    /// no prefetching, and minimal size.
    fn default() -> Self {
        Self {
            enabled: false,
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            latency: defaults::CACHE_LATENCY,
            prefetcher: Prefetcher::default(),
            prefetch: PrefetchConfig::default(),
            composite: CompositeConfig::default(),
        }
    }
}

/// Parameters shared by all queued prefetch strategies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefetchConfig {
    /// Prefetch degree (lines to prefetch per trigger)
    #[serde(default = "PrefetchConfig::default_degree")]
    pub degree: usize,

    /// Pattern table size (stride prefetcher)
    #[serde(default = "PrefetchConfig::default_table_size")]
    pub table_size: usize,

    /// Maximum number of pending candidates per strategy
    #[serde(default = "PrefetchConfig::default_queue_size")]
    pub queue_size: usize,

    /// Ticks between observing an access and its candidates becoming ready
    #[serde(default = "PrefetchConfig::default_latency")]
    pub latency: u64,

    /// Train only on misses (strategies that need hits still observe them)
    #[serde(default)]
    pub on_miss_only: bool,
}

impl PrefetchConfig {
    /// Returns the default prefetch degree (lines per trigger).
    fn default_degree() -> usize {
        defaults::PREFETCH_DEGREE
    }

    /// Returns the default prefetcher pattern table size.
    fn default_table_size() -> usize {
        defaults::PREFETCH_TABLE_SIZE
    }

    /// Returns the default pending-candidate queue size.
    fn default_queue_size() -> usize {
        defaults::PREFETCH_QUEUE_SIZE
    }

    /// Returns the default prefetch latency in ticks.
    fn default_latency() -> u64 {
        defaults::PREFETCH_LATENCY
    }
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            degree: defaults::PREFETCH_DEGREE,
            table_size: defaults::PREFETCH_TABLE_SIZE,
            queue_size: defaults::PREFETCH_QUEUE_SIZE,
            latency: defaults::PREFETCH_LATENCY,
            on_miss_only: false,
        }
    }
}

/// One entry of the composite strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StrategyConfig {
    /// Strategy kind
    pub kind: Prefetcher,

    /// Whether the strategy participates
    #[serde(default = "StrategyConfig::default_enabled")]
    pub enabled: bool,
}

impl StrategyConfig {
    /// Entries listed without an `enabled` key participate.
    fn default_enabled() -> bool {
        true
    }

    /// Creates an enabled entry.
    pub const fn enabled(kind: Prefetcher) -> Self {
        Self {
            kind,
            enabled: true,
        }
    }

    /// Creates a disabled entry.
    pub const fn disabled(kind: Prefetcher) -> Self {
        Self {
            kind,
            enabled: false,
        }
    }
}

/// Composite prefetcher configuration.
///
/// List order is priority order when retrieving candidates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompositeConfig {
    /// Strategies in priority order
    #[serde(default = "CompositeConfig::default_strategies")]
    pub strategies: Vec<StrategyConfig>,
}

impl CompositeConfig {
    /// Stride first, then tagged, both enabled.
    fn default_strategies() -> Vec<StrategyConfig> {
        vec![
            StrategyConfig::enabled(Prefetcher::Stride),
            StrategyConfig::enabled(Prefetcher::Tagged),
        ]
    }
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            strategies: Self::default_strategies(),
        }
    }
}
