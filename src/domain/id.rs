//! Identifiers for work items and milestones
//!
//! Identifiers come from the storage layer as opaque strings. They are
//! trimmed on the way in and must not be empty; no other format is imposed.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Identifier must not be empty")]
    Empty,
}

fn normalize(raw: &str) -> Result<String, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }
    Ok(trimmed.to_string())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, rejecting blank input
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
                normalize(raw.as_ref()).map(Self)
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Serde adapter for optional references to other records
///
/// Blank strings mean "no reference". Numbers are read as their decimal
/// form and any other shape is dropped with a warning.
pub(crate) fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<String, Error = IdError>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(raw)) => T::try_from(raw).ok(),
        Some(serde_json::Value::Number(n)) => T::try_from(n.to_string()).ok(),
        Some(other) => {
            warn!("Ignoring malformed reference: {}", other);
            None
        }
    })
}

string_id!(
    /// Identifier of a work item
    ItemId
);

string_id!(
    /// Identifier of a milestone (deliverable)
    MilestoneId
);
