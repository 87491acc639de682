//! Lock handle options

use leaselock_domain::constants::{DEFAULT_CACHE_DIR_NAME, DEFAULT_POLL_INTERVAL, LOCK_KEY_PREFIX};
use leaselock_domain::value_objects::LockAction;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Optional overrides for a lock handle
///
/// Defaults: bundled scripts, hash cache under the user cache directory,
/// the `redislock@` key prefix and a 20 ms poll interval.
#[derive(Debug, Clone)]
pub struct LockOptions {
    lock_script: Option<PathBuf>,
    unlock_script: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    key_prefix: String,
    poll_interval: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            lock_script: None,
            unlock_script: None,
            cache_dir: dirs::cache_dir().map(|dir| dir.join(DEFAULT_CACHE_DIR_NAME)),
            key_prefix: LOCK_KEY_PREFIX.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl LockOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the procedure source at `path` for `action`
    ///
    /// Ignored unless `path` names an existing regular file, in which case
    /// the previous setting is kept.
    pub fn with_script_file<P: AsRef<Path>>(mut self, action: LockAction, path: P) -> Self {
        let path = path.as_ref();
        if !path.is_file() {
            warn!(
                action = %action,
                path = %path.display(),
                "Ignoring script override: not a readable file"
            );
            return self;
        }
        match action {
            LockAction::Lock => self.lock_script = Some(path.to_path_buf()),
            LockAction::Unlock => self.unlock_script = Some(path.to_path_buf()),
        }
        self
    }

    /// Persist registered script hashes under `dir`
    ///
    /// The directory is checked on every resolution; when it is missing or
    /// not a directory, file caching is skipped.
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Never persist script hashes
    pub fn without_cache_dir(mut self) -> Self {
        self.cache_dir = None;
        self
    }

    /// Namespace prefix for lock keys
    pub fn with_key_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Pause between acquisition attempts; zero keeps the current value
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        self
    }

    /// Source override for an action, if any
    pub fn script_file(&self, action: LockAction) -> Option<&Path> {
        match action {
            LockAction::Lock => self.lock_script.as_deref(),
            LockAction::Unlock => self.unlock_script.as_deref(),
        }
    }

    /// Configured hash cache directory
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Lock key prefix
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Poll interval of the acquisition loop
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
