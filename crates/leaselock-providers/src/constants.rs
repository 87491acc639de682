//! Provider Constants
//!
//! Constants specific to provider implementations.

use std::time::Duration;

// ============================================================================
// REDIS PROVIDER CONSTANTS
// ============================================================================

/// Time allowed to establish the shared connection
pub const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Time allowed for a single command round trip
pub const REDIS_RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// MEMORY PROVIDER CONSTANTS
// ============================================================================

/// Provider name reported by the in-memory provider
pub const MEMORY_PROVIDER_NAME: &str = "memory";

/// Provider name reported by the Redis provider
pub const REDIS_PROVIDER_NAME: &str = "redis";
