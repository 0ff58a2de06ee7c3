//! Identifiers for channels and anomaly annotations
//!
//! Channel names come from the hierarchy document; anomaly ids are assigned by
//! whoever creates the annotation. Both are wrapped in newtypes so the two
//! cannot be mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a single data channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ChannelName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&ChannelName> for ChannelName {
    fn from(name: &ChannelName) -> Self {
        name.clone()
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChannelName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Caller-assigned identifier of an anomaly annotation.
///
/// Unique within one channel's collection only. The JSON form is either a
/// bare integer or a string, matching whatever the labelling view produced.
/// Other JSON values (fractional numbers, integers outside `i64`, objects)
/// fail to decode rather than being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnomalyId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AnomalyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyId::Number(n) => write!(f, "{}", n),
            AnomalyId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for AnomalyId {
    fn from(id: i64) -> Self {
        AnomalyId::Number(id)
    }
}

impl From<i32> for AnomalyId {
    fn from(id: i32) -> Self {
        AnomalyId::Number(i64::from(id))
    }
}

impl From<&str> for AnomalyId {
    fn from(id: &str) -> Self {
        AnomalyId::Text(id.to_string())
    }
}

impl From<String> for AnomalyId {
    fn from(id: String) -> Self {
        AnomalyId::Text(id)
    }
}
