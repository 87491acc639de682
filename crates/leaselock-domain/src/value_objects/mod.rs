//! Domain Value Objects
//!
//! Immutable values exchanged between the lock core and its ports.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`LockAction`] | Which server-side procedure is meant (lock or unlock) |
//! | [`LockKey`] | Namespaced cache key derived from a resource name |
//! | [`OwnershipToken`] | Random per-handle credential |
//! | [`ScriptHandle`] | Content hash of a registered procedure |
//! | [`ScriptReply`] | Decoded reply of a procedure invocation |

/// Lock identity value objects
pub mod lock;
/// Server-side procedure value objects
pub mod script;

pub use lock::{LockAction, LockKey, OwnershipToken};
pub use script::{ScriptHandle, ScriptReply};
