//! Lock configuration types

use leaselock_domain::constants::{
    DEFAULT_CACHE_DIR_NAME, DEFAULT_LEASE, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT,
    LOCK_KEY_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Lock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Prefix namespacing lock keys
    pub key_prefix: String,

    /// Directory for persisted script hashes (`None` disables the cache)
    pub cache_dir: Option<PathBuf>,

    /// Lock procedure source override
    pub lock_script: Option<PathBuf>,

    /// Unlock procedure source override
    pub unlock_script: Option<PathBuf>,

    /// Default wait budget in milliseconds
    pub wait_timeout_ms: u64,

    /// Default lease in milliseconds
    pub lease_ms: u64,

    /// Pause between acquisition attempts in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            key_prefix: LOCK_KEY_PREFIX.to_string(),
            cache_dir: dirs::cache_dir().map(|dir| dir.join(DEFAULT_CACHE_DIR_NAME)),
            lock_script: None,
            unlock_script: None,
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT.as_millis() as u64,
            lease_ms: DEFAULT_LEASE.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl LockConfig {
    /// Default wait budget
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Default lease
    pub fn lease(&self) -> Duration {
        Duration::from_millis(self.lease_ms)
    }

    /// Pause between acquisition attempts
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
