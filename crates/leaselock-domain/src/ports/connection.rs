//! Connection Provider Port
//!
//! Defines how the lock core borrows a connection to the shared cache
//! service and what it needs from that connection.

use crate::error::Result;
use crate::value_objects::{ScriptHandle, ScriptReply};
use async_trait::async_trait;

/// A borrowed connection able to register and invoke server-side procedures
///
/// Dropping the connection returns it to whatever pool it was borrowed from,
/// so every exit path of a caller releases it.
#[async_trait]
pub trait ScriptConnection: Send {
    /// Register a procedure source and return its content hash
    async fn load_script(&mut self, source: &str) -> Result<ScriptHandle>;

    /// Invoke a registered procedure by handle
    ///
    /// Implementations must report an unknown handle as
    /// [`Error::StaleHandle`](crate::error::Error::StaleHandle) so callers
    /// can re-register and retry.
    async fn invoke_script(
        &mut self,
        handle: &ScriptHandle,
        keys: &[&str],
        args: &[&str],
    ) -> Result<ScriptReply>;
}

/// Supplier of live connections to the cache service
///
/// Owns connect, retry and pooling policy.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Borrow a connection
    async fn borrow(&self) -> Result<Box<dyn ScriptConnection>>;

    /// Name of the backing provider for logs
    fn provider_name(&self) -> &str;
}
