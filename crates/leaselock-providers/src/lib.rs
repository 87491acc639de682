//! # leaselock - Provider Implementations
//!
//! Implementations of the `ConnectionProvider` port defined in
//! `leaselock-domain`.
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`MemoryConnectionProvider`] | Testing | In-process emulation of the lock procedures |
//! | [`RedisConnectionProvider`] | Distributed | Redis server with Lua scripting |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! leaselock-providers = { version = "0.1", default-features = false }
//! ```

pub use leaselock_domain::error::{Error, Result};
pub use leaselock_domain::ports::{ConnectionProvider, ScriptConnection};

/// Provider-specific constants
pub mod constants;

/// In-memory connection provider
pub mod memory;

/// Redis connection provider
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryConnectionProvider;
#[cfg(feature = "redis")]
pub use self::redis::RedisConnectionProvider;
