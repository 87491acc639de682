//! Provider and lock wiring tests

use leaselock_domain::value_objects::LockAction;
use leaselock_infrastructure::LockFactory;
use leaselock_infrastructure::config::{AppConfig, LockConfig, RedisConfig};
use leaselock_infrastructure::factory::{build_connection_provider, build_lock_options};
use leaselock_providers::MemoryConnectionProvider;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_lock_options_follow_config() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("nested").join("cache");
    let script = dir.path().join("lock.lua");
    std::fs::write(&script, "return 1").unwrap();

    let config = LockConfig {
        key_prefix: "jobs:".to_string(),
        cache_dir: Some(cache_dir.clone()),
        lock_script: Some(script.clone()),
        unlock_script: Some(dir.path().join("missing.lua")),
        poll_interval_ms: 5,
        ..LockConfig::default()
    };

    let options = build_lock_options(&config);
    assert_eq!(options.key_prefix(), "jobs:");
    assert_eq!(options.poll_interval(), Duration::from_millis(5));
    assert_eq!(options.cache_dir(), Some(cache_dir.as_path()));
    assert!(cache_dir.is_dir());
    assert_eq!(options.script_file(LockAction::Lock), Some(script.as_path()));
    assert_eq!(options.script_file(LockAction::Unlock), None);
}

#[test]
fn test_disabled_cache_dir() {
    let config = LockConfig {
        cache_dir: None,
        ..LockConfig::default()
    };
    assert!(build_lock_options(&config).cache_dir().is_none());
}

#[test]
fn test_redis_provider_is_lazy() {
    let config = RedisConfig {
        port: 1,
        ..RedisConfig::default()
    };
    let provider = build_connection_provider(&config).unwrap();
    assert_eq!(provider.provider_name(), "redis");
}

#[test]
fn test_invalid_redis_url_is_rejected() {
    let config = RedisConfig {
        url: Some("not a url".to_string()),
        ..RedisConfig::default()
    };
    assert!(build_connection_provider(&config).is_err());
}

#[test]
fn test_factory_from_config_reads_defaults() {
    let mut config = AppConfig::default();
    config.lock.cache_dir = None;
    config.lock.wait_timeout_ms = 1500;

    let factory = LockFactory::from_config(&config).unwrap();
    assert_eq!(factory.wait_timeout(), Duration::from_millis(1500));
    assert_eq!(factory.lease(), Duration::from_secs(30));
    assert_eq!(factory.provider().provider_name(), "redis");
}

#[tokio::test]
async fn test_factory_handles_share_provider() {
    let dir = TempDir::new().unwrap();
    let server = MemoryConnectionProvider::new();
    let config = LockConfig {
        cache_dir: Some(dir.path().to_path_buf()),
        ..LockConfig::default()
    };
    let factory = LockFactory::new(
        Arc::new(server.clone()),
        build_lock_options(&config),
        config.wait_timeout(),
        config.lease(),
    );

    let a = factory.lock("deploy");
    let b = factory.lock("deploy");
    assert_ne!(a.token().as_str(), b.token().as_str());

    assert!(a.try_acquire(Duration::from_millis(50), factory.lease()).await);
    assert!(!b.try_acquire(Duration::from_millis(50), factory.lease()).await);
    a.release().await;
    assert!(b.try_acquire(Duration::from_millis(50), factory.lease()).await);
    assert_eq!(server.outstanding_connections(), 0);
}
