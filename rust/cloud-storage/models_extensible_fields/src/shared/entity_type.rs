//! Entity type shared across database and service layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_ENTITY_TYPE_LEN: usize = 64;

/// Tag naming the kind of host entity a field or value applies to, e.g. `contact`.
///
/// Host entity kinds are owned by the calling services, so this is an open string tag rather than
/// a closed enum. Tags are lowercase ASCII identifiers (`[a-z0-9_]`, at most 64 chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct EntityType(String);

/// The input string is not a valid entity type tag
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid entity type {value:?}: {reason}")]
pub struct InvalidEntityType {
    value: String,
    reason: &'static str,
}

impl EntityType {
    /// Parse and validate an entity type tag.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidEntityType> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("must not be empty")
        } else if value.len() > MAX_ENTITY_TYPE_LEN {
            Some("must be at most 64 characters")
        } else if !value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        {
            Some("must only contain lowercase ascii letters, digits and underscores")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidEntityType { value, reason }),
            None => Ok(Self(value)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityType {
    type Err = InvalidEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityType {
    type Error = InvalidEntityType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.0
    }
}

impl AsRef<str> for EntityType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
