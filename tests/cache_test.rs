//! Tests for [`ContentCache`] — bounded, per-entry TTL cache.

use std::time::Duration;

use examforge::GeneratedContent;
use examforge::cache::{CacheConfig, ContentCache};
use serde_json::json;

fn make_content(n: usize) -> GeneratedContent {
    GeneratedContent::new(json!({
        "title": format!("quiz {n}"),
        "questions": (0..n).map(|i| json!({ "question": format!("q{i}") })).collect::<Vec<_>>(),
    }))
}

// =========================================================================
// CacheConfig
// =========================================================================

#[test]
fn cache_config_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.max_entries, 1_000);
    assert_eq!(config.ttl, Duration::from_secs(1800));
}

#[test]
fn cache_config_builder() {
    let config = CacheConfig::new()
        .max_entries(500)
        .ttl(Duration::from_secs(60));
    assert_eq!(config.max_entries, 500);
    assert_eq!(config.ttl, Duration::from_secs(60));
}

// =========================================================================
// get / set
// =========================================================================

#[tokio::test]
async fn miss_then_hit_returns_identical_data() {
    let cache = ContentCache::new(&CacheConfig::default());
    assert!(cache.get("qcm:debutant:droit_penal").await.is_none());

    let content = make_content(3);
    cache
        .set("qcm:debutant:droit_penal", content.clone(), Duration::from_secs(60))
        .await;

    let hit = cache.get("qcm:debutant:droit_penal").await.unwrap();
    assert_eq!(hit, content);
    assert_eq!(
        serde_json::to_string(&hit).unwrap(),
        serde_json::to_string(&content).unwrap()
    );
}

#[tokio::test]
async fn keys_are_independent() {
    let cache = ContentCache::new(&CacheConfig::default());
    cache.set("a", make_content(1), Duration::from_secs(60)).await;
    assert!(cache.get("b").await.is_none());
    assert!(cache.get("a").await.is_some());
}

#[tokio::test]
async fn set_overwrites_existing_entry() {
    let cache = ContentCache::new(&CacheConfig::default());
    cache.set("k", make_content(1), Duration::from_secs(60)).await;
    cache.set("k", make_content(4), Duration::from_secs(60)).await;

    let hit = cache.get("k").await.unwrap();
    assert_eq!(hit.as_value()["questions"].as_array().unwrap().len(), 4);
}

// =========================================================================
// Expiry
// =========================================================================

#[tokio::test]
async fn expired_entry_is_not_returned() {
    let cache = ContentCache::new(&CacheConfig::default());
    cache.set("k", make_content(2), Duration::from_millis(50)).await;
    assert!(cache.get("k").await.is_some());

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(cache.get("k").await.is_none());
    // Stays evicted
    assert!(cache.get("k").await.is_none());
}

#[tokio::test]
async fn zero_ttl_is_immediately_stale() {
    let cache = ContentCache::new(&CacheConfig::default());
    cache.set("k", make_content(1), Duration::ZERO).await;
    assert!(cache.get("k").await.is_none());
}

#[tokio::test]
async fn overwrite_resets_lifetime() {
    let cache = ContentCache::new(&CacheConfig::default());
    cache.set("k", make_content(1), Duration::from_millis(60)).await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    cache.set("k", make_content(2), Duration::from_secs(60)).await;
    tokio::time::sleep(Duration::from_millis(60)).await;

    let hit = cache.get("k").await.unwrap();
    assert_eq!(hit.as_value()["questions"].as_array().unwrap().len(), 2);
}

// =========================================================================
// Capacity
// =========================================================================

#[tokio::test]
async fn capacity_is_bounded() {
    let cache = ContentCache::new(&CacheConfig::new().max_entries(10));
    for i in 0..100 {
        cache
            .set(&format!("key-{i}"), make_content(1), Duration::from_secs(60))
            .await;
    }
    assert!(cache.len().await <= 10);
}

#[tokio::test]
async fn clear_evicts_everything() {
    let cache = ContentCache::new(&CacheConfig::default());
    cache.set("a", make_content(1), Duration::from_secs(60)).await;
    cache.set("b", make_content(1), Duration::from_secs(60)).await;
    assert_eq!(cache.len().await, 2);

    cache.clear();
    assert!(cache.get("a").await.is_none());
    assert!(cache.get("b").await.is_none());
}
