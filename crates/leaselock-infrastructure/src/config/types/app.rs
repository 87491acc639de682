//! Application configuration root

use super::{LockConfig, LoggingConfig, RedisConfig};
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Cache service connection
    pub redis: RedisConfig,

    /// Lock behavior
    pub lock: LockConfig,

    /// Logging output
    pub logging: LoggingConfig,
}
