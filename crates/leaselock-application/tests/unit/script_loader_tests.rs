//! Script loader tests

use crate::test_utils::Fixture;
use leaselock_application::script_loader::cache_file_name;
use leaselock_application::{LockOptions, ScriptLoader};
use leaselock_domain::ports::ConnectionProvider;
use leaselock_domain::value_objects::LockAction;

#[tokio::test]
async fn test_second_resolve_uses_cache_file() {
    let fixture = Fixture::new();
    let loader = ScriptLoader::new(&fixture.options());
    let mut conn = fixture.server.borrow().await.unwrap();

    let first = loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();
    let second = loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.server.registration_count(), 1);

    let cached = std::fs::read_to_string(
        fixture.cache_dir.path().join(cache_file_name(LockAction::Lock)),
    )
    .unwrap();
    assert_eq!(cached, first.as_str());
}

#[tokio::test]
async fn test_actions_are_cached_separately() {
    let fixture = Fixture::new();
    let loader = ScriptLoader::new(&fixture.options());
    let mut conn = fixture.server.borrow().await.unwrap();

    let lock = loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();
    let unlock = loader.resolve(conn.as_mut(), LockAction::Unlock).await.unwrap();

    assert_ne!(lock, unlock);
    assert_eq!(fixture.server.registration_count(), 2);
    assert!(fixture.cache_dir.path().join("luasha.leaselock.lock.dat").is_file());
    assert!(fixture.cache_dir.path().join("luasha.leaselock.unlock.dat").is_file());
}

#[tokio::test]
async fn test_cached_handle_is_trusted_without_network() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.cache_dir.path().join(cache_file_name(LockAction::Lock)),
        "cafebabe\n",
    )
    .unwrap();

    let loader = ScriptLoader::new(&fixture.options());
    let mut conn = fixture.server.borrow().await.unwrap();
    let handle = loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();

    assert_eq!(handle.as_str(), "cafebabe");
    assert_eq!(fixture.server.registration_count(), 0);
}

#[tokio::test]
async fn test_empty_cache_file_forces_registration() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.cache_dir.path().join(cache_file_name(LockAction::Unlock)),
        "",
    )
    .unwrap();

    let loader = ScriptLoader::new(&fixture.options());
    let mut conn = fixture.server.borrow().await.unwrap();
    let handle = loader.resolve(conn.as_mut(), LockAction::Unlock).await.unwrap();

    assert!(!handle.is_empty());
    assert_eq!(fixture.server.registration_count(), 1);
}

#[tokio::test]
async fn test_unusable_cache_dir_skips_caching() {
    let fixture = Fixture::new();
    let not_a_dir = fixture.cache_dir.path().join("plain-file");
    std::fs::write(&not_a_dir, "x").unwrap();

    for options in [
        LockOptions::new().with_cache_dir(&not_a_dir),
        LockOptions::new().with_cache_dir(fixture.cache_dir.path().join("missing")),
        LockOptions::new().without_cache_dir(),
    ] {
        let loader = ScriptLoader::new(&options);
        assert!(loader.cache_file(LockAction::Lock).await.is_none());
    }

    let loader = ScriptLoader::new(&LockOptions::new().with_cache_dir(&not_a_dir));
    let mut conn = fixture.server.borrow().await.unwrap();
    loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();
    loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();
    assert_eq!(fixture.server.registration_count(), 2);
}

#[tokio::test]
async fn test_empty_override_source_is_unresolved() {
    let fixture = Fixture::new();
    let script = fixture.cache_dir.path().join("blank.lua");
    std::fs::write(&script, "  \n\t").unwrap();

    let options = fixture
        .options()
        .with_script_file(LockAction::Lock, &script);
    let loader = ScriptLoader::new(&options);
    let mut conn = fixture.server.borrow().await.unwrap();

    let err = loader
        .resolve(conn.as_mut(), LockAction::Lock)
        .await
        .unwrap_err();
    assert!(err.is_procedure_unresolved());
    assert_eq!(fixture.server.registration_count(), 0);
}

#[tokio::test]
async fn test_override_source_is_registered_trimmed() {
    let fixture = Fixture::new();
    let script = fixture.cache_dir.path().join("custom-unlock.lua");
    std::fs::write(
        &script,
        "\n  if redis.call(\"GET\", KEYS[1]) == ARGV[1] then return redis.call(\"DEL\", KEYS[1]) end return 0  \n",
    )
    .unwrap();

    let options = fixture
        .options()
        .with_script_file(LockAction::Unlock, &script);
    let loader = ScriptLoader::new(&options);
    let mut conn = fixture.server.borrow().await.unwrap();

    let custom = loader.resolve(conn.as_mut(), LockAction::Unlock).await.unwrap();
    let bundled = ScriptLoader::new(&LockOptions::new().without_cache_dir())
        .resolve(conn.as_mut(), LockAction::Unlock)
        .await
        .unwrap();
    assert_ne!(custom, bundled);
}

#[tokio::test]
async fn test_invalidate_removes_cache_file() {
    let fixture = Fixture::new();
    let loader = ScriptLoader::new(&fixture.options());
    let mut conn = fixture.server.borrow().await.unwrap();
    loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();

    let path = fixture.cache_dir.path().join(cache_file_name(LockAction::Lock));
    assert!(path.is_file());

    loader.invalidate(LockAction::Lock).await;
    assert!(!path.exists());

    // Invalidating twice is harmless
    loader.invalidate(LockAction::Lock).await;

    loader.resolve(conn.as_mut(), LockAction::Lock).await.unwrap();
    assert_eq!(fixture.server.registration_count(), 2);
}
