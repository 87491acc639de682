//! Domain layer constants
//!
//! Defaults shared by every layer. Infrastructure-only constants live in
//! `leaselock_infrastructure::constants`.

use std::time::Duration;

// ============================================================================
// LOCK CONSTANTS
// ============================================================================

/// Prefix namespacing lock keys away from unrelated cache entries
pub const LOCK_KEY_PREFIX: &str = "redislock@";

/// Length of the per-handle ownership token
pub const OWNERSHIP_TOKEN_LEN: usize = 16;

/// Wait budget used when the caller passes a zero duration
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Lease used when the caller passes a zero duration
pub const DEFAULT_LEASE: Duration = Duration::from_secs(30);

/// Pause between two acquisition attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

// ============================================================================
// SCRIPT CACHE CONSTANTS
// ============================================================================

/// File name prefix of persisted script handles
pub const SCRIPT_CACHE_FILE_PREFIX: &str = "luasha.leaselock";

/// File name extension of persisted script handles
pub const SCRIPT_CACHE_FILE_EXT: &str = "dat";

/// Directory under the user cache dir holding persisted script handles
pub const DEFAULT_CACHE_DIR_NAME: &str = "leaselock";

/// Error code returned by Redis for an unknown script hash
pub const NOSCRIPT_ERROR_CODE: &str = "NOSCRIPT";
