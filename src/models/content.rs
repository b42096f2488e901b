use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Type tag of a favoritable entity, written `app_label.model`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentType(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid content type '{0}': expected app_label.model")]
pub struct InvalidContentType(pub String);

impl ContentType {
    pub fn new(raw: &str) -> Result<Self, InvalidContentType> {
        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        };

        match raw.split_once('.') {
            Some((app, model)) if valid_part(app) && valid_part(model) => Ok(Self(raw.to_string())),
            _ => Err(InvalidContentType(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn model(&self) -> &str {
        self.0.split_once('.').map(|(_, model)| model).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentType {
    type Err = InvalidContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContentType {
    type Error = InvalidContentType;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        ContentType::new(&raw)
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContentType::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Reference to one content object: its type tag plus identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub content_type: ContentType,
    pub object_id: i64,
}

impl ContentRef {
    pub fn new(content_type: ContentType, object_id: i64) -> Self {
        Self {
            content_type,
            object_id,
        }
    }
}

/// A content object that was found by its registered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentObject {
    #[serde(flatten)]
    pub content_ref: ContentRef,
    pub label: Option<String>,
}
