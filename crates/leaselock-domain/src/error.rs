//! Error handling types
//!
//! Every failure inside the lock core is one of these variants. The public
//! boolean operations on a lock handle collapse them, the `*_checked`
//! variants hand them to the caller so the cause stays visible.

use crate::value_objects::LockAction;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for leaselock
#[derive(Error, Debug)]
pub enum Error {
    /// A connection to the cache service could not be borrowed
    #[error("Connection unavailable: {message}")]
    ConnectionUnavailable {
        /// Description of the connection failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server-side procedure for an action could not be resolved
    #[error("Procedure unresolved for {action}: {message}")]
    ProcedureUnresolved {
        /// Action whose procedure is missing
        action: LockAction,
        /// Why resolution failed
        message: String,
    },

    /// The server no longer recognizes a previously registered procedure
    #[error("Stale procedure handle: {handle}")]
    StaleHandle {
        /// The handle the server rejected
        handle: String,
    },

    /// A remote script invocation or registration failed
    #[error("Script error: {message}")]
    Script {
        /// Description of the script failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Lock error creation methods
impl Error {
    /// Create a connection unavailable error
    pub fn connection_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection unavailable error with source
    pub fn connection_unavailable_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a procedure unresolved error
    pub fn procedure_unresolved<S: Into<String>>(action: LockAction, message: S) -> Self {
        Self::ProcedureUnresolved {
            action,
            message: message.into(),
        }
    }

    /// Create a stale handle error
    pub fn stale_handle<S: Into<String>>(handle: S) -> Self {
        Self::StaleHandle {
            handle: handle.into(),
        }
    }

    /// Create a script error
    pub fn script<S: Into<String>>(message: S) -> Self {
        Self::Script {
            message: message.into(),
            source: None,
        }
    }

    /// Create a script error with source
    pub fn script_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Script {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration and argument error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// Classification helpers
impl Error {
    /// Whether the server rejected a cached procedure handle
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Self::StaleHandle { .. })
    }

    /// Whether the failure happened before any connection was available
    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable { .. })
    }

    /// Whether the procedure for an action could not be resolved
    pub fn is_procedure_unresolved(&self) -> bool {
        matches!(self, Self::ProcedureUnresolved { .. })
    }

    /// Short stable label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionUnavailable { .. } => "connection_unavailable",
            Self::ProcedureUnresolved { .. } => "procedure_unresolved",
            Self::StaleHandle { .. } => "stale_handle",
            Self::Script { .. } => "script",
            Self::IoSimple { .. } | Self::Io { .. } => "io",
            Self::Configuration { .. } => "configuration",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Infrastructure { .. } => "infrastructure",
        }
    }
}
