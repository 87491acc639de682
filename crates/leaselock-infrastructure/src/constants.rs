//! Infrastructure layer constants
//!
//! Lock defaults shared with the core live in `leaselock_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "leaselock.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "leaselock";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "LEASELOCK";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// REDIS CONSTANTS
// ============================================================================

/// Redis default host
pub const DEFAULT_REDIS_HOST: &str = "127.0.0.1";

/// Redis default port
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Connect timeout in milliseconds
pub const DEFAULT_REDIS_CONNECT_TIMEOUT_MS: u64 = 1000;

/// Response timeout in milliseconds
pub const DEFAULT_REDIS_RESPONSE_TIMEOUT_MS: u64 = 2000;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "LEASELOCK_LOG";

// ============================================================================
// CLI CONSTANTS
// ============================================================================

/// Exit code when the lock could not be acquired (EX_TEMPFAIL)
pub const EXIT_LOCK_NOT_ACQUIRED: u8 = 75;
