// Allow collapsible_if for nested cache-file checks
#![allow(clippy::collapsible_if)]

//! # leaselock - Application Layer
//!
//! The lock core: [`LockHandle`] with its acquisition loop and release
//! protocol, and the [`ScriptLoader`] that registers the server-side
//! procedures once and reuses them by content hash.
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `leaselock-domain`: value objects, connection ports and errors
//! - `tokio` for file I/O and timers, `tracing` for logging

pub mod lock;
pub mod options;
pub mod script_loader;
pub mod scripts;

pub use lock::{LockHandle, effective_lease, effective_wait_timeout};
pub use options::LockOptions;
pub use script_loader::ScriptLoader;
pub use scripts::{LOCK_SCRIPT, UNLOCK_SCRIPT};
