//! Bundled server-side procedures
//!
//! Used whenever no override file is configured for an action.

use leaselock_domain::value_objects::LockAction;

/// Conditional set-if-absent with a millisecond expiry.
///
/// `KEYS[1]` is the lock key, `ARGV[1]` the ownership token and `ARGV[2]`
/// the lease in milliseconds. Returns 1 when the key was set, 0 otherwise.
pub const LOCK_SCRIPT: &str = include_str!("../scripts/lock.lua");

/// Ownership-checked delete.
///
/// `KEYS[1]` is the lock key and `ARGV[1]` the ownership token. Returns 1
/// when the key held the token and was deleted, 0 otherwise.
pub const UNLOCK_SCRIPT: &str = include_str!("../scripts/unlock.lua");

/// Bundled source for an action
pub fn bundled_source(action: LockAction) -> &'static str {
    match action {
        LockAction::Lock => LOCK_SCRIPT,
        LockAction::Unlock => UNLOCK_SCRIPT,
    }
}
