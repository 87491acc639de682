//! Provider and lock wiring
//!
//! Turns configuration into a shared connection provider and lock options,
//! and hands out lock handles built from them.

use crate::config::{AppConfig, LockConfig, RedisConfig};
use leaselock_application::{LockHandle, LockOptions};
use leaselock_domain::error::Result;
use leaselock_domain::ports::ConnectionProvider;
use leaselock_domain::value_objects::LockAction;
use leaselock_providers::RedisConnectionProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Build the Redis connection provider described by `config`
pub fn build_connection_provider(config: &RedisConfig) -> Result<Arc<dyn ConnectionProvider>> {
    let provider = RedisConnectionProvider::new(&config.connection_url())?
        .with_connect_timeout(config.connect_timeout())
        .with_response_timeout(config.response_timeout())
        .with_ping_on_borrow(config.ping_on_borrow);
    debug!(host = %config.host, port = config.port, "Redis connection provider configured");
    Ok(Arc::new(provider))
}

/// Build lock options from `config`
///
/// A configured cache directory is created when missing; if that fails,
/// hash caching is skipped at resolution time.
pub fn build_lock_options(config: &LockConfig) -> LockOptions {
    let mut options = LockOptions::new()
        .with_key_prefix(config.key_prefix.clone())
        .with_poll_interval(config.poll_interval());

    options = match &config.cache_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!(path = %dir.display(), error = %e, "Cannot create script cache directory");
            }
            options.with_cache_dir(dir)
        }
        None => options.without_cache_dir(),
    };

    if let Some(path) = &config.lock_script {
        options = options.with_script_file(LockAction::Lock, path);
    }
    if let Some(path) = &config.unlock_script {
        options = options.with_script_file(LockAction::Unlock, path);
    }
    options
}

/// Hands out lock handles sharing one provider and one set of options
#[derive(Clone)]
pub struct LockFactory {
    provider: Arc<dyn ConnectionProvider>,
    options: LockOptions,
    wait_timeout: Duration,
    lease: Duration,
}

impl LockFactory {
    /// Create a factory from parts
    pub fn new(
        provider: Arc<dyn ConnectionProvider>,
        options: LockOptions,
        wait_timeout: Duration,
        lease: Duration,
    ) -> Self {
        Self {
            provider,
            options,
            wait_timeout,
            lease,
        }
    }

    /// Create a factory backed by Redis from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            build_connection_provider(&config.redis)?,
            build_lock_options(&config.lock),
            config.lock.wait_timeout(),
            config.lock.lease(),
        ))
    }

    /// New handle for `resource`, with its own ownership token
    pub fn lock<S: Into<String>>(&self, resource: S) -> LockHandle {
        LockHandle::with_options(resource, Arc::clone(&self.provider), self.options.clone())
    }

    /// Shared connection provider
    pub fn provider(&self) -> Arc<dyn ConnectionProvider> {
        Arc::clone(&self.provider)
    }

    /// Options applied to every handle
    pub fn options(&self) -> &LockOptions {
        &self.options
    }

    /// Configured default wait budget
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Configured default lease
    pub fn lease(&self) -> Duration {
        self.lease
    }
}

impl std::fmt::Debug for LockFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockFactory")
            .field("provider", &self.provider.provider_name())
            .field("options", &self.options)
            .field("wait_timeout", &self.wait_timeout)
            .field("lease", &self.lease)
            .finish()
    }
}
