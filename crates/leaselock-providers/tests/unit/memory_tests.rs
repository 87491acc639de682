//! In-memory provider tests

use leaselock_application::{LOCK_SCRIPT, LockHandle, LockOptions, UNLOCK_SCRIPT};
use leaselock_domain::ports::ConnectionProvider;
use leaselock_domain::value_objects::ScriptReply;
use leaselock_providers::MemoryConnectionProvider;
use std::sync::Arc;
use std::time::Duration;

const LOCK: &str = r#"if redis.call("SET", KEYS[1], ARGV[1], "NX", "PX", ARGV[2]) then return 1 end return 0"#;
const UNLOCK: &str = r#"if redis.call("GET", KEYS[1]) == ARGV[1] then return redis.call("DEL", KEYS[1]) end return 0"#;

#[tokio::test]
async fn test_conditional_set_is_exclusive() {
    let provider = MemoryConnectionProvider::new();
    let mut conn = provider.borrow().await.unwrap();
    let lock = conn.load_script(LOCK).await.unwrap();

    let first = conn
        .invoke_script(&lock, &["redislock@a"], &["token-a", "30000"])
        .await
        .unwrap();
    let second = conn
        .invoke_script(&lock, &["redislock@a"], &["token-b", "30000"])
        .await
        .unwrap();

    assert_eq!(first, ScriptReply::Integer(1));
    assert_eq!(second, ScriptReply::Integer(0));
    assert_eq!(provider.get("redislock@a").as_deref(), Some("token-a"));
    assert!(provider.ttl("redislock@a").unwrap() <= Duration::from_secs(30));
}

#[tokio::test]
async fn test_checked_delete_requires_owner() {
    let provider = MemoryConnectionProvider::new();
    provider.set("redislock@a", "token-a", None);

    let mut conn = provider.borrow().await.unwrap();
    let unlock = conn.load_script(UNLOCK).await.unwrap();

    let stranger = conn
        .invoke_script(&unlock, &["redislock@a"], &["token-b"])
        .await
        .unwrap();
    assert_eq!(stranger, ScriptReply::Integer(0));
    assert!(provider.get("redislock@a").is_some());

    let owner = conn
        .invoke_script(&unlock, &["redislock@a"], &["token-a"])
        .await
        .unwrap();
    assert_eq!(owner, ScriptReply::Integer(1));
    assert!(provider.get("redislock@a").is_none());
}

#[tokio::test]
async fn test_registration_is_content_addressed() {
    let provider = MemoryConnectionProvider::new();
    let mut conn = provider.borrow().await.unwrap();

    let first = conn.load_script(LOCK).await.unwrap();
    let second = conn.load_script(LOCK).await.unwrap();
    let other = conn.load_script(UNLOCK).await.unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(provider.registration_count(), 3);
    assert!(conn.load_script("return 42").await.is_err());
}

#[tokio::test]
async fn test_flushed_scripts_are_stale() {
    let provider = MemoryConnectionProvider::new();
    let mut conn = provider.borrow().await.unwrap();
    let lock = conn.load_script(LOCK).await.unwrap();

    provider.flush_scripts();

    let err = conn
        .invoke_script(&lock, &["redislock@a"], &["token", "1000"])
        .await
        .unwrap_err();
    assert!(err.is_stale_handle());
}

#[tokio::test]
async fn test_invalid_lease_is_rejected() {
    let provider = MemoryConnectionProvider::new();
    let mut conn = provider.borrow().await.unwrap();
    let lock = conn.load_script(LOCK).await.unwrap();

    let result = conn
        .invoke_script(&lock, &["redislock@a"], &["token", "0"])
        .await;
    assert!(result.is_err());
    assert!(provider.get("redislock@a").is_none());
}

#[tokio::test]
async fn test_connections_are_returned_on_drop() {
    let provider = MemoryConnectionProvider::new();
    {
        let _a = provider.borrow().await.unwrap();
        let _b = provider.borrow().await.unwrap();
        assert_eq!(provider.outstanding_connections(), 2);
    }
    assert_eq!(provider.outstanding_connections(), 0);
    assert_eq!(provider.borrow_count(), 2);
}

#[tokio::test]
async fn test_unavailable_server_refuses_borrow() {
    let provider = MemoryConnectionProvider::new();
    provider.set_unavailable(true);

    let err = provider.borrow().await.err().unwrap();
    assert!(err.is_connection_unavailable());
    assert_eq!(provider.outstanding_connections(), 0);

    provider.set_unavailable(false);
    assert!(provider.borrow().await.is_ok());
}

#[tokio::test]
async fn test_bundled_scripts_are_recognized() {
    let provider = MemoryConnectionProvider::new();
    provider.set("redislock@a", "token-a", None);
    let mut conn = provider.borrow().await.unwrap();

    let lock = conn.load_script(LOCK_SCRIPT).await.unwrap();
    let unlock = conn.load_script(UNLOCK_SCRIPT).await.unwrap();

    let taken = conn
        .invoke_script(&lock, &["redislock@a"], &["token-b", "1000"])
        .await
        .unwrap();
    assert_eq!(taken, ScriptReply::Integer(0));

    let stranger = conn
        .invoke_script(&unlock, &["redislock@a"], &["token-b"])
        .await
        .unwrap();
    assert_eq!(stranger, ScriptReply::Integer(0));
    assert_eq!(provider.get("redislock@a").as_deref(), Some("token-a"));
}

#[tokio::test]
async fn test_unconditional_delete_is_refused() {
    let provider = MemoryConnectionProvider::new();
    let mut conn = provider.borrow().await.unwrap();

    let unchecked = r#"redis.call("GET", KEYS[1]) return redis.call("DEL", KEYS[1])"#;
    assert!(conn.load_script(unchecked).await.is_err());
    assert_eq!(provider.registration_count(), 0);
}

#[tokio::test]
async fn test_lock_handle_release_checks_owner() {
    let provider = MemoryConnectionProvider::new();
    let options = LockOptions::new().without_cache_dir();
    let owner = LockHandle::with_options("report", Arc::new(provider.clone()), options.clone());
    let intruder = LockHandle::with_options("report", Arc::new(provider.clone()), options);

    assert!(
        owner
            .try_acquire(Duration::from_millis(50), Duration::from_secs(30))
            .await
    );
    assert!(!intruder.release_checked().await.unwrap());
    assert_eq!(
        provider.get("redislock@report").as_deref(),
        Some(owner.token().as_str())
    );
    assert!(owner.release_checked().await.unwrap());
    assert!(provider.get("redislock@report").is_none());
}
