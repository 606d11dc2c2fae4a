//! Session identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::token::generate_hash;

/// Opaque session id, carried in the `sid` cookie.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh, unguessable session id.
    pub fn generate() -> Self {
        Self(generate_hash())
    }

    /// Wrap an id read from a cookie or the database.
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
