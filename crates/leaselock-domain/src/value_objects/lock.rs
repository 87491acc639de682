//! Lock identity value objects

use crate::constants::OWNERSHIP_TOKEN_LEN;
use crate::error::Error;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Action type selecting a server-side procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockAction {
    /// Conditional set-if-absent with expiry
    Lock,
    /// Ownership-checked delete
    Unlock,
}

impl LockAction {
    /// Both actions, in registration order
    pub const ALL: [LockAction; 2] = [LockAction::Lock, LockAction::Unlock];

    /// Lowercase name used in file names and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
        }
    }
}

impl fmt::Display for LockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lock" => Ok(Self::Lock),
            "unlock" => Ok(Self::Unlock),
            other => Err(Error::invalid_argument(format!(
                "Unknown lock action: {other}. Use lock or unlock"
            ))),
        }
    }
}

/// Namespaced cache key of a lockable resource
///
/// The key is the resource name behind a fixed prefix so lock entries never
/// collide with other data stored in the same cache service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey(String);

impl LockKey {
    /// Derive the key for `resource` under `prefix`
    pub fn new(prefix: &str, resource: &str) -> Self {
        Self(format!("{prefix}{resource}"))
    }

    /// The full key as stored on the server
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Random credential proving that a handle owns a lock
///
/// Generated once per handle and never changed afterwards. There is no way
/// to build a token from an arbitrary string, so two handles can only share
/// one by cloning.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OwnershipToken(String);

impl OwnershipToken {
    /// Generate a fresh alphanumeric token
    pub fn generate() -> Self {
        let value: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(OWNERSHIP_TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(value)
    }

    /// Token text as sent to the server
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for OwnershipToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnershipToken({}…)", &self.0[..4.min(self.0.len())])
    }
}
