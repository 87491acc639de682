//! Configuration management
//!
//! TOML files and environment variables merged over defaults with Figment.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, LockConfig, LoggingConfig, RedisConfig};
