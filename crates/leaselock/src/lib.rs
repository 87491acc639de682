//! # leaselock
//!
//! Mutual exclusion across processes and hosts through a shared Redis
//! server. A lock is a key holding a random ownership token under a lease;
//! acquisition and release run as server-side scripts so no other client
//! can interleave.
//!
//! ## Example
//!
//! ```ignore
//! use leaselock::application::LockHandle;
//! use leaselock::providers::RedisConnectionProvider;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let provider = Arc::new(RedisConnectionProvider::new("redis://127.0.0.1:6379")?);
//! let lock = LockHandle::new("job-42", provider);
//! if lock.try_acquire(Duration::from_secs(1), Duration::from_secs(30)).await {
//!     // critical section
//!     lock.release().await;
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - errors, value objects and connection ports
//! - `application` - lock handle, acquisition loop and script loader
//! - `providers` - Redis and in-memory connection providers
//! - `infrastructure` - configuration, logging and wiring
//! - `cli` - the `leaselock` command line runner

/// Domain layer - errors, value objects and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use leaselock_domain::*;
}

/// Application layer - lock handle and script resolution
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use leaselock_application::*;
}

/// Connection providers
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use leaselock_providers::*;
}

/// Infrastructure layer - config, logging and wiring
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use leaselock_infrastructure::*;
}

pub mod cli;

pub use leaselock_application::{LockHandle, LockOptions};
pub use leaselock_domain::{Error, Result};
pub use leaselock_infrastructure::LockFactory;
