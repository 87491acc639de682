//! Redis connection configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Redis connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Full connection URL; overrides host, port, password and database
    pub url: Option<String>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Password for AUTH
    pub password: Option<String>,

    /// Logical database index
    pub database: u32,

    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Response timeout in milliseconds
    pub response_timeout_ms: u64,

    /// Check connections with PING before lending them
    pub ping_on_borrow: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_REDIS_HOST.to_string(),
            port: DEFAULT_REDIS_PORT,
            password: None,
            database: 0,
            connect_timeout_ms: DEFAULT_REDIS_CONNECT_TIMEOUT_MS,
            response_timeout_ms: DEFAULT_REDIS_RESPONSE_TIMEOUT_MS,
            ping_on_borrow: true,
        }
    }
}

impl RedisConfig {
    /// Connection URL for the Redis client
    pub fn connection_url(&self) -> String {
        if let Some(url) = self.url.as_deref().filter(|url| !url.is_empty()) {
            return url.to_string();
        }
        let auth = match self.password.as_deref() {
            Some(password) if !password.is_empty() => format!(":{password}@"),
            _ => String::new(),
        };
        format!(
            "redis://{auth}{}:{}/{}",
            self.host, self.port, self.database
        )
    }

    /// Connect timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Response timeout
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}
