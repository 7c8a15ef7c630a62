//! # Configuration Tests
//!
//! Tests for configuration structures, JSON deserialization and defaults.

use pretty_assertions::assert_eq;
use rvsim_prefetch::common::PrefetchError;
use rvsim_prefetch::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.prefetcher, Prefetcher::None);
}

#[test]
fn test_cache_config_defaults() {
    let cache = CacheConfig::default();
    assert_eq!(cache.size_bytes, 4096);
    assert_eq!(cache.line_bytes, 64);
    assert_eq!(cache.ways, 1);
    assert_eq!(cache.latency, 1);
}

#[test]
fn test_prefetch_config_defaults() {
    let prefetch = PrefetchConfig::default();
    assert_eq!(prefetch.degree, 1);
    assert_eq!(prefetch.table_size, 64);
    assert_eq!(prefetch.queue_size, 32);
    assert_eq!(prefetch.latency, 1);
    assert!(!prefetch.on_miss_only);
}

#[test]
fn test_composite_defaults_to_stride_then_tagged() {
    assert_eq!(
        CompositeConfig::default().strategies,
        vec![
            StrategyConfig::enabled(Prefetcher::Stride),
            StrategyConfig::enabled(Prefetcher::Tagged),
        ]
    );
}

#[test]
fn test_empty_json_uses_defaults() {
    let config = Config::from_json("{}").expect("empty object is valid");
    assert_eq!(config.cache.prefetch, PrefetchConfig::default());
    assert_eq!(config.cache.composite, CompositeConfig::default());
}

#[test]
fn test_prefetcher_kinds_deserialize() {
    for (name, kind) in [
        ("None", Prefetcher::None),
        ("NextLine", Prefetcher::NextLine),
        ("Stride", Prefetcher::Stride),
        ("Stream", Prefetcher::Stream),
        ("Tagged", Prefetcher::Tagged),
        ("Composite", Prefetcher::Composite),
    ] {
        let json = format!(r#"{{ "cache": {{ "prefetcher": "{name}" }} }}"#);
        let config = Config::from_json(&json).expect("kind parses");
        assert_eq!(config.cache.prefetcher, kind);
    }
}

#[test]
fn test_strategy_entry_enabled_by_default() {
    let json = r#"{ "cache": { "composite": { "strategies": [ { "kind": "Stream" } ] } } }"#;
    let config = Config::from_json(json).expect("entry parses");
    assert_eq!(
        config.cache.composite.strategies,
        vec![StrategyConfig::enabled(Prefetcher::Stream)]
    );
}

#[test]
fn test_empty_strategy_list_is_kept() {
    let json = r#"{ "cache": { "composite": { "strategies": [] } } }"#;
    let config = Config::from_json(json).expect("empty list parses");
    assert!(config.cache.composite.strategies.is_empty());
}

#[test]
fn test_unknown_kind_is_parse_error() {
    let json = r#"{ "cache": { "prefetcher": "Markov" } }"#;
    assert!(matches!(
        Config::from_json(json),
        Err(PrefetchError::Parse(_))
    ));
}

#[test]
fn test_only_leaf_kinds_can_be_aggregated() {
    assert!(Prefetcher::Stride.is_leaf());
    assert!(Prefetcher::Tagged.is_leaf());
    assert!(!Prefetcher::None.is_leaf());
    assert!(!Prefetcher::Composite.is_leaf());
}
