use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Connection counts at or above this value are reported by the source as `"500+"`.
pub const CONNECTIONS_CAP: u64 = 500;

const CONNECTIONS_SENTINEL: &str = "500+";

/// A single candidate: an opaque id, a job title and a popularity count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Unique identifier within a dataset
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Free-text job title, replaced by its normalized form during preprocessing
    #[serde(rename = "job_title")]
    pub title: String,
    /// Popularity signal, either a plain count or the `"500+"` sentinel
    #[serde(rename = "connection")]
    pub connections: Connections,
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>, connections: Connections) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            connections,
        }
    }
}

/// Raw connection count as it arrives from the loader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Connections {
    Count(u64),
    Text(String),
}

impl Connections {
    /// Coerce to a numeric count.
    ///
    /// `"500+"` (surrounding whitespace allowed) maps to [`CONNECTIONS_CAP`];
    /// any other text must parse as a non-negative integer.
    pub fn count(&self) -> Result<u64> {
        match self {
            Self::Count(n) => Ok(*n),
            Self::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed == CONNECTIONS_SENTINEL {
                    return Ok(CONNECTIONS_CAP);
                }
                trimmed.parse::<u64>().map_err(|_| {
                    Error::InvalidInput(format!("connection count {raw:?} is not a number"))
                })
            }
        }
    }
}

impl From<u64> for Connections {
    fn from(n: u64) -> Self {
        Self::Count(n)
    }
}

impl From<&str> for Connections {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for Connections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

// Loaders hand ids over as numbers or strings; both are kept as opaque text.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
