//! Domain Port Interfaces
//!
//! The lock core only talks to the cache service through these traits.
//! Providers in `leaselock-providers` implement them for Redis and for an
//! in-memory emulation used in tests.

/// Connection provider ports
pub mod connection;

pub use connection::{ConnectionProvider, ScriptConnection};
