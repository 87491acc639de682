//! Configuration types

pub mod app;
pub mod lock;
pub mod logging;
pub mod redis;

pub use app::AppConfig;
pub use lock::LockConfig;
pub use logging::LoggingConfig;
pub use redis::RedisConfig;
