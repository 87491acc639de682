//! # leaselock - Infrastructure Layer
//!
//! Cross-cutting technical concerns around the lock core.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration: defaults, TOML, environment |
//! | [`logging`] | Structured logging with tracing |
//! | [`factory`] | Redis provider and lock option wiring |
//! | [`error_ext`] | Context helpers for foreign errors |
//! | [`constants`] | Infrastructure constants |
//! | [`utils`] | Timing helpers |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod factory;
pub mod logging;
pub mod utils;

pub use error_ext::ErrorContext;
pub use factory::LockFactory;
pub use utils::TimedOperation;
