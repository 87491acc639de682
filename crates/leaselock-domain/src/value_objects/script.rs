//! Server-side procedure value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash identifying a registered procedure
///
/// Returned by script registration and reusable by any client that knows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptHandle(String);

impl ScriptHandle {
    /// Wrap a handle, trimming surrounding whitespace
    pub fn new<S: AsRef<str>>(value: S) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    /// Handle text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty handle never refers to a registered procedure
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScriptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded reply of a procedure invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptReply {
    /// Integer reply
    Integer(i64),
    /// String reply
    Text(String),
    /// Nil reply
    Nil,
}

impl ScriptReply {
    /// Integer value of the reply, parsing numeric text
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Nil => None,
        }
    }

    /// A positive integer means the procedure applied its change
    pub fn is_success(&self) -> bool {
        self.as_integer().is_some_and(|n| n > 0)
    }
}
