//! # leaselock - Domain Layer
//!
//! Core types for the lease-based distributed lock: value objects for keys,
//! tokens and script handles, the connection ports the lock core consumes,
//! and the shared error type.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error enum and `Result` alias |
//! | [`constants`] | Lock defaults and naming constants |
//! | [`value_objects`] | `LockAction`, `LockKey`, `OwnershipToken`, `ScriptHandle`, `ScriptReply` |
//! | [`ports`] | `ConnectionProvider` and `ScriptConnection` traits |

/// Domain constants
pub mod constants;
/// Error handling types
pub mod error;
/// Connection port interfaces
pub mod ports;
/// Immutable value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{ConnectionProvider, ScriptConnection};
pub use value_objects::{LockAction, LockKey, OwnershipToken, ScriptHandle, ScriptReply};
