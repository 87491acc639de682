//! Lock Handle
//!
//! A handle names a lockable resource and carries a random ownership token
//! generated at construction. Acquisition polls the lock procedure until it
//! reports a successful conditional set or the wait budget runs out; release
//! runs the ownership-checked delete once.
//!
//! ## Example
//!
//! ```ignore
//! use leaselock_application::LockHandle;
//! use std::time::Duration;
//!
//! let lock = LockHandle::new("job-42", provider.clone());
//! if lock.try_acquire(Duration::from_secs(1), Duration::from_secs(30)).await {
//!     // critical section
//!     lock.release().await;
//! }
//! ```

use crate::options::LockOptions;
use crate::script_loader::ScriptLoader;
use leaselock_domain::constants::{DEFAULT_LEASE, DEFAULT_WAIT_TIMEOUT};
use leaselock_domain::error::Result;
use leaselock_domain::ports::{ConnectionProvider, ScriptConnection};
use leaselock_domain::value_objects::{
    LockAction, LockKey, OwnershipToken, ScriptHandle, ScriptReply,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Wait budget after replacing a zero duration with the default
pub fn effective_wait_timeout(wait_timeout: Duration) -> Duration {
    if wait_timeout.is_zero() {
        DEFAULT_WAIT_TIMEOUT
    } else {
        wait_timeout
    }
}

/// Lease after replacing a sub-millisecond duration with the default
///
/// The server takes the lease in whole milliseconds.
pub fn effective_lease(lease: Duration) -> Duration {
    if lease.as_millis() == 0 {
        DEFAULT_LEASE
    } else {
        lease
    }
}

/// Distributed lock on one named resource
pub struct LockHandle {
    resource: String,
    key: LockKey,
    token: OwnershipToken,
    provider: Arc<dyn ConnectionProvider>,
    loader: ScriptLoader,
    poll_interval: Duration,
}

impl LockHandle {
    /// Create a handle with default options
    pub fn new<S: Into<String>>(resource: S, provider: Arc<dyn ConnectionProvider>) -> Self {
        Self::with_options(resource, provider, LockOptions::default())
    }

    /// Create a handle with explicit options
    pub fn with_options<S: Into<String>>(
        resource: S,
        provider: Arc<dyn ConnectionProvider>,
        options: LockOptions,
    ) -> Self {
        let resource = resource.into();
        Self {
            key: LockKey::new(options.key_prefix(), &resource),
            resource,
            token: OwnershipToken::generate(),
            provider,
            loader: ScriptLoader::new(&options),
            poll_interval: options.poll_interval(),
        }
    }

    /// Name of the protected resource
    pub fn resource_name(&self) -> &str {
        &self.resource
    }

    /// Namespaced key stored on the server
    pub fn key(&self) -> &LockKey {
        &self.key
    }

    /// This handle's ownership token
    pub fn token(&self) -> &OwnershipToken {
        &self.token
    }

    /// Try to take the lock, waiting at most `wait_timeout`
    ///
    /// Zero durations fall back to a 5 second wait and a 30 second lease.
    /// Every failure, including an unreachable cache service, yields `false`.
    pub async fn try_acquire(&self, wait_timeout: Duration, lease: Duration) -> bool {
        match self.try_acquire_checked(wait_timeout, lease).await {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!(
                    resource = %self.resource,
                    kind = e.kind(),
                    error = %e,
                    "Lock acquisition failed"
                );
                false
            }
        }
    }

    /// Like [`try_acquire`](Self::try_acquire) but reports why it failed
    ///
    /// `Ok(false)` means the wait budget ran out under contention.
    pub async fn try_acquire_checked(&self, wait_timeout: Duration, lease: Duration) -> Result<bool> {
        let wait_timeout = effective_wait_timeout(wait_timeout);
        let lease = effective_lease(lease);

        let mut conn = self.provider.borrow().await?;
        let mut handle = self.loader.resolve(conn.as_mut(), LockAction::Lock).await?;
        let lease_ms = lease.as_millis().to_string();
        let args = [self.token.as_str(), lease_ms.as_str()];

        let started = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self
                .invoke(conn.as_mut(), LockAction::Lock, &mut handle, &args)
                .await
            {
                Ok(reply) if reply.is_success() => {
                    info!(
                        resource = %self.resource,
                        attempts,
                        lease_ms = lease_ms.as_str(),
                        "Lock acquired"
                    );
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) if e.is_procedure_unresolved() => return Err(e),
                Err(e) => debug!(
                    resource = %self.resource,
                    attempts,
                    error = %e,
                    "Lock attempt errored"
                ),
            }

            if started.elapsed() > wait_timeout {
                debug!(
                    resource = %self.resource,
                    attempts,
                    waited_ms = started.elapsed().as_millis() as u64,
                    "Lock wait budget exhausted"
                );
                return Ok(false);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Release the lock if this handle still owns it
    ///
    /// Best effort: failures are logged and otherwise ignored, the lease
    /// bounds how long an unreleased lock survives.
    pub async fn release(&self) {
        if let Err(e) = self.release_checked().await {
            warn!(
                resource = %self.resource,
                kind = e.kind(),
                error = %e,
                "Lock release failed"
            );
        }
    }

    /// Like [`release`](Self::release) but reports the outcome
    ///
    /// `Ok(true)` when the key held this handle's token and was deleted.
    pub async fn release_checked(&self) -> Result<bool> {
        let mut conn = self.provider.borrow().await?;
        let mut handle = self
            .loader
            .resolve(conn.as_mut(), LockAction::Unlock)
            .await?;

        let reply = self
            .invoke(
                conn.as_mut(),
                LockAction::Unlock,
                &mut handle,
                &[self.token.as_str()],
            )
            .await?;

        let released = reply.is_success();
        if released {
            info!(resource = %self.resource, "Lock released");
        } else {
            debug!(resource = %self.resource, "Release skipped: lock not owned");
        }
        Ok(released)
    }

    /// Invoke a procedure, re-registering once if the server forgot it
    async fn invoke(
        &self,
        conn: &mut dyn ScriptConnection,
        action: LockAction,
        handle: &mut ScriptHandle,
        args: &[&str],
    ) -> Result<ScriptReply> {
        let keys = [self.key.as_str()];
        match conn.invoke_script(handle, &keys, args).await {
            Err(e) if e.is_stale_handle() => {
                warn!(
                    action = %action,
                    handle = %handle,
                    "Server rejected cached script handle, registering again"
                );
                self.loader.invalidate(action).await;
                *handle = self.loader.resolve(&mut *conn, action).await?;
                conn.invoke_script(handle, &keys, args).await
            }
            other => other,
        }
    }
}

impl fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockHandle")
            .field("resource", &self.resource)
            .field("key", &self.key)
            .field("token", &self.token)
            .field("provider", &self.provider.provider_name())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
