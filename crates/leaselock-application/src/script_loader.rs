//! Script Loader
//!
//! Produces a registered-procedure handle for an action while keeping round
//! trips to the cache service low. Handles are persisted to one small file
//! per action, so a restarted process finds them without registering again.
//!
//! Resolution order:
//!
//! 1. Cached handle file under the cache directory, returned verbatim.
//! 2. Source file override, or the bundled script.
//! 3. Registration on the server, then best-effort write of the cache file.
//!
//! A cached handle is trusted without validation. When the server rejects
//! it, callers invalidate the file and resolve again.

use crate::options::LockOptions;
use crate::scripts::bundled_source;
use leaselock_domain::constants::{SCRIPT_CACHE_FILE_EXT, SCRIPT_CACHE_FILE_PREFIX};
use leaselock_domain::error::{Error, Result};
use leaselock_domain::ports::ScriptConnection;
use leaselock_domain::value_objects::{LockAction, ScriptHandle};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Resolves and caches procedure handles
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    lock_script: Option<PathBuf>,
    unlock_script: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
}

impl ScriptLoader {
    /// Create a loader from lock options
    pub fn new(options: &LockOptions) -> Self {
        Self {
            lock_script: options.script_file(LockAction::Lock).map(Path::to_path_buf),
            unlock_script: options
                .script_file(LockAction::Unlock)
                .map(Path::to_path_buf),
            cache_dir: options.cache_dir().map(Path::to_path_buf),
        }
    }

    /// Cache file for `action`, if the cache directory is usable right now
    pub async fn cache_file(&self, action: LockAction) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        match fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => Some(dir.join(cache_file_name(action))),
            _ => None,
        }
    }

    /// Resolve the procedure handle for `action`
    pub async fn resolve(
        &self,
        conn: &mut dyn ScriptConnection,
        action: LockAction,
    ) -> Result<ScriptHandle> {
        let cache_file = self.cache_file(action).await;

        if let Some(path) = &cache_file {
            if let Some(handle) = read_cached_handle(path).await {
                debug!(action = %action, path = %path.display(), "Script handle cache hit");
                return Ok(handle);
            }
        }

        let source = self.read_source(action).await?;
        let handle = conn.load_script(&source).await?;
        if handle.is_empty() {
            return Err(Error::procedure_unresolved(
                action,
                "server returned an empty script handle",
            ));
        }
        debug!(action = %action, handle = %handle, "Registered script");

        if let Some(path) = &cache_file {
            if let Err(e) = fs::write(path, handle.as_str()).await {
                warn!(
                    action = %action,
                    path = %path.display(),
                    error = %e,
                    "Failed to persist script handle"
                );
            }
        }

        Ok(handle)
    }

    /// Forget the persisted handle for `action`
    pub async fn invalidate(&self, action: LockAction) {
        let Some(path) = self.cache_file(action).await else {
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => debug!(action = %action, path = %path.display(), "Removed cached script handle"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                action = %action,
                path = %path.display(),
                error = %e,
                "Failed to remove cached script handle"
            ),
        }
    }

    /// Trimmed procedure source for `action`
    async fn read_source(&self, action: LockAction) -> Result<String> {
        let override_path = match action {
            LockAction::Lock => self.lock_script.as_ref(),
            LockAction::Unlock => self.unlock_script.as_ref(),
        };

        let source: Cow<'static, str> = match override_path {
            Some(path) => match fs::read_to_string(path).await {
                Ok(text) => Cow::Owned(text),
                Err(e) => {
                    return Err(Error::procedure_unresolved(
                        action,
                        format!("cannot read {}: {e}", path.display()),
                    ));
                }
            },
            None => Cow::Borrowed(bundled_source(action)),
        };

        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(Error::procedure_unresolved(action, "script source is empty"));
        }
        Ok(trimmed.to_string())
    }
}

/// File name of the persisted handle for `action`
pub fn cache_file_name(action: LockAction) -> String {
    format!("{SCRIPT_CACHE_FILE_PREFIX}.{action}.{SCRIPT_CACHE_FILE_EXT}")
}

async fn read_cached_handle(path: &Path) -> Option<ScriptHandle> {
    let bytes = fs::read(path).await.ok()?;
    let handle = ScriptHandle::new(String::from_utf8_lossy(&bytes));
    (!handle.is_empty()).then_some(handle)
}
