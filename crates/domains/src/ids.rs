//! # Identifiers
//!
//! Every entity has exactly one canonical identifier type: a positive 64-bit
//! integer assigned by the store. Wrapping them in newtypes keeps a `CardId`
//! from ever being passed where a `UserId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a path segment or payload value is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {entity} id '{raw}': expected a positive integer")]
pub struct IdParseError {
    pub entity: &'static str,
    pub raw: String,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Entity name used in error messages.
            pub const ENTITY: &'static str = $entity;

            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(IdParseError {
                        entity: $entity,
                        raw: s.to_owned(),
                    }),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifies a [`crate::models::User`].
    UserId,
    "user"
);
entity_id!(
    /// Identifies a [`crate::models::Board`].
    BoardId,
    "board"
);
entity_id!(
    /// Identifies a [`crate::models::List`].
    ListId,
    "list"
);
entity_id!(
    /// Identifies a [`crate::models::Card`].
    CardId,
    "card"
);
