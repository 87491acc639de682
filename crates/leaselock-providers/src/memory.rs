//! In-memory connection provider
//!
//! Emulates the two lock procedures inside the process so the lock core can
//! be exercised without a server. Registered sources are classified by the
//! commands they issue: `SET KEYS[1] ARGV[1] NX PX ARGV[2]` becomes the
//! conditional set, a `DEL` guarded by `GET KEYS[1] == ARGV[1]` becomes the
//! ownership-checked delete. Any other source is refused. Both run
//! under one mutex, which gives the same atomicity as server-side scripts.
//!
//! The provider also counts borrows, registrations and invocations, and can
//! simulate an unreachable server or a server restart that forgot its
//! scripts.

use crate::constants::MEMORY_PROVIDER_NAME;
use async_trait::async_trait;
use leaselock_domain::error::{Error, Result};
use leaselock_domain::ports::{ConnectionProvider, ScriptConnection};
use leaselock_domain::value_objects::{ScriptHandle, ScriptReply};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Procedure a registered source maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Procedure {
    ConditionalSet,
    CheckedDelete,
}

/// `SET` of the token with a millisecond expiry, only if absent
const CONDITIONAL_SET_CALL: &str = "\"SET\",KEYS[1],ARGV[1],\"NX\",\"PX\",ARGV[2])";

/// Token comparison guarding the delete
const OWNER_CHECK: &str = "\"GET\",KEYS[1])==ARGV[1]";

/// Delete of the lock key
const DELETE_CALL: &str = "\"DEL\",KEYS[1])";

impl Procedure {
    /// Recognize a source by its command shape, ignoring case and whitespace
    ///
    /// A delete is only accepted behind the ownership comparison, so a
    /// source that deletes unconditionally is refused at registration.
    fn classify(source: &str) -> Option<Self> {
        let compact: String = source
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .map(|c| if c == '\'' { '"' } else { c })
            .collect();

        if compact.contains(CONDITIONAL_SET_CALL) {
            return Some(Self::ConditionalSet);
        }
        let check = compact.find(OWNER_CHECK)?;
        let delete = compact.find(DELETE_CALL)?;
        // First delete must come after the comparison
        (check < delete).then_some(Self::CheckedDelete)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Default)]
struct Server {
    store: HashMap<String, Entry>,
    scripts: HashMap<String, Procedure>,
}

impl Server {
    fn live_value(&mut self, key: &str) -> Option<&str> {
        let now = Instant::now();
        if self.store.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.store.remove(key);
        }
        self.store.get(key).map(|entry| entry.value.as_str())
    }
}

#[derive(Debug, Default)]
struct Shared {
    server: Mutex<Server>,
    unavailable: AtomicBool,
    borrows: AtomicUsize,
    outstanding: AtomicUsize,
    registrations: AtomicUsize,
    invocations: AtomicUsize,
}

impl Shared {
    fn server(&self) -> MutexGuard<'_, Server> {
        // A panic while holding the lock leaves the map consistent.
        self.server
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// In-process stand-in for a Redis server
///
/// Clones share the same emulated server.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnectionProvider {
    shared: Arc<Shared>,
}

impl MemoryConnectionProvider {
    /// Create an empty emulated server
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `borrow` fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Forget all registered scripts, like `SCRIPT FLUSH` or a restart
    pub fn flush_scripts(&self) {
        self.shared.server().scripts.clear();
    }

    /// Current value at `key`, honoring expiry
    pub fn get(&self, key: &str) -> Option<String> {
        self.shared.server().live_value(key).map(str::to_string)
    }

    /// Store `value` at `key` with an optional time to live
    pub fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.shared.server().store.insert(key.to_string(), entry);
    }

    /// Remaining time to live at `key`, if it has one
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut server = self.shared.server();
        server.live_value(key)?;
        server
            .store
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Number of successful borrows so far
    pub fn borrow_count(&self) -> usize {
        self.shared.borrows.load(Ordering::SeqCst)
    }

    /// Connections borrowed and not yet returned
    pub fn outstanding_connections(&self) -> usize {
        self.shared.outstanding.load(Ordering::SeqCst)
    }

    /// Number of script registrations so far
    pub fn registration_count(&self) -> usize {
        self.shared.registrations.load(Ordering::SeqCst)
    }

    /// Number of script invocations so far
    pub fn invocation_count(&self) -> usize {
        self.shared.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionProvider for MemoryConnectionProvider {
    async fn borrow(&self) -> Result<Box<dyn ScriptConnection>> {
        if self.shared.unavailable.load(Ordering::SeqCst) {
            return Err(Error::connection_unavailable(
                "in-memory server marked unavailable",
            ));
        }
        self.shared.borrows.fetch_add(1, Ordering::SeqCst);
        self.shared.outstanding.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            shared: Arc::clone(&self.shared),
        }))
    }

    fn provider_name(&self) -> &str {
        MEMORY_PROVIDER_NAME
    }
}

/// Connection to the emulated server; returns itself on drop
struct MemoryConnection {
    shared: Arc<Shared>,
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.shared.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScriptConnection for MemoryConnection {
    async fn load_script(&mut self, source: &str) -> Result<ScriptHandle> {
        let procedure = Procedure::classify(source)
            .ok_or_else(|| Error::script("unsupported script for the in-memory server"))?;
        let handle = hex::encode(Sha256::digest(source.as_bytes()));

        self.shared
            .server()
            .scripts
            .insert(handle.clone(), procedure);
        self.shared.registrations.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptHandle::new(handle))
    }

    async fn invoke_script(
        &mut self,
        handle: &ScriptHandle,
        keys: &[&str],
        args: &[&str],
    ) -> Result<ScriptReply> {
        self.shared.invocations.fetch_add(1, Ordering::SeqCst);
        let mut server = self.shared.server();
        let procedure = *server
            .scripts
            .get(handle.as_str())
            .ok_or_else(|| Error::stale_handle(handle.as_str()))?;

        let key = *keys
            .first()
            .ok_or_else(|| Error::script("script expects one key"))?;
        let token = *args
            .first()
            .ok_or_else(|| Error::script("script expects an ownership token"))?;

        match procedure {
            Procedure::ConditionalSet => {
                let lease_ms: u64 = args
                    .get(1)
                    .and_then(|ms| ms.parse().ok())
                    .filter(|ms| *ms > 0)
                    .ok_or_else(|| Error::script("invalid expire time in 'set' command"))?;
                if server.live_value(key).is_some() {
                    return Ok(ScriptReply::Integer(0));
                }
                server.store.insert(
                    key.to_string(),
                    Entry {
                        value: token.to_string(),
                        expires_at: Some(Instant::now() + Duration::from_millis(lease_ms)),
                    },
                );
                Ok(ScriptReply::Integer(1))
            }
            Procedure::CheckedDelete => {
                if server.live_value(key) == Some(token) {
                    server.store.remove(key);
                    Ok(ScriptReply::Integer(1))
                } else {
                    Ok(ScriptReply::Integer(0))
                }
            }
        }
    }
}
