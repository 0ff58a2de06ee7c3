//! Anomaly annotations
//!
//! An anomaly is one labelled interval or point on a channel. Apart from its
//! id and owning channel the record is opaque: time range, category, notes and
//! whatever else the labelling view attaches travel as a JSON payload that is
//! never interpreted here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{AnomalyId, ChannelName};

/// Keys owned by the record itself; payload writes to these are ignored.
const RESERVED_KEYS: [&str; 2] = ["id", "channelName"];

/// A labelled anomaly on a single channel.
///
/// The id is fixed at construction. Replacing an annotation means building a
/// new `Anomaly` with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    id: AnomalyId,

    #[serde(rename = "channelName")]
    channel_name: ChannelName,

    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Anomaly {
    /// Create an annotation with an empty payload.
    pub fn new(channel_name: impl Into<ChannelName>, id: impl Into<AnomalyId>) -> Self {
        Self {
            id: id.into(),
            channel_name: channel_name.into(),
            payload: Map::new(),
        }
    }

    /// Builder-style payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    pub fn id(&self) -> &AnomalyId {
        &self.id
    }

    pub fn channel_name(&self) -> &ChannelName {
        &self.channel_name
    }

    /// Re-home the annotation on another channel. The id is kept.
    pub fn set_channel_name(&mut self, channel_name: impl Into<ChannelName>) {
        self.channel_name = channel_name.into();
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Set a payload field, returning the previous value.
    ///
    /// `id` and `channelName` are not payload and are left untouched.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return None;
        }
        self.payload.insert(key, value.into())
    }

    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.payload.remove(key)
    }
}
