//! Tag field normalization
//!
//! Tags reach us either as a comma-separated string (`"ui, backend"`), as a
//! JSON-encoded list stored in a string (`"[\"ui\",\"backend\"]"`), or as an
//! actual list. The loose field is decoded once into [`TagField`] and then
//! normalized into trimmed, non-empty strings. Anything we cannot make sense
//! of yields no tags rather than an error.

use log::warn;
use serde::{Deserialize, Deserializer};

/// A decoded tag field, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagField {
    /// A delimited (or JSON-encoded) string
    Raw(String),
    /// An already-split list
    List(Vec<String>),
}

impl TagField {
    /// Decodes a loosely-typed JSON value into a tag field
    ///
    /// Returns `None` for null and for shapes that cannot hold tags.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(TagField::Raw(s)),
            serde_json::Value::Array(values) => {
                let mut tags = Vec::with_capacity(values.len());
                for value in values {
                    match value {
                        serde_json::Value::String(s) => tags.push(s),
                        other => warn!("Ignoring non-string tag value: {}", other),
                    }
                }
                Some(TagField::List(tags))
            }
            other => {
                warn!("Ignoring malformed tag field: {}", other);
                None
            }
        }
    }

    /// Normalizes into an ordered list of trimmed, non-empty tags
    pub fn normalize(&self) -> Vec<String> {
        match self {
            TagField::List(tags) => clean(tags.iter().map(String::as_str)),
            TagField::Raw(raw) => {
                let raw = raw.trim();
                if raw.starts_with('[') {
                    match serde_json::from_str::<Vec<String>>(raw) {
                        Ok(tags) => clean(tags.iter().map(String::as_str)),
                        Err(e) => {
                            warn!("Unparsable tag list {:?}: {}", raw, e);
                            Vec::new()
                        }
                    }
                } else {
                    clean(raw.split(','))
                }
            }
        }
    }
}

fn clean<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    tags.map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes an optional tag field; absent input yields no tags
pub fn normalize_tags(field: Option<&TagField>) -> Vec<String> {
    field.map(TagField::normalize).unwrap_or_default()
}

/// Serde adapter: deserializes any tag shape into normalized tags
///
/// Never fails on the tag value itself.
pub fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let field = value.and_then(TagField::from_value);
    Ok(normalize_tags(field.as_ref()))
}
