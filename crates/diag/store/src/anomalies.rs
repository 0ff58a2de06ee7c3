//! Anomaly registry
//!
//! Owns, per channel, the ordered list of anomaly annotations. Entries are
//! addressed by their id, never by position. Ids are unique per channel by
//! caller contract only: `add` does not check for collisions.
//!
//! A channel that was never annotated and a channel whose annotations were all
//! deleted read the same way: as an empty list.

use std::collections::HashMap;
use std::sync::RwLock;

use diag_types::{Anomaly, AnomalyId, ChannelName};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lock::{read, write};

/// Whether a targeted mutation found something to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    /// The target existed and was changed.
    Applied,

    /// No entry matched; nothing changed.
    NotFound,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == MutationOutcome::Applied
    }
}

#[derive(Debug, Default)]
pub struct AnomalyRegistry {
    by_channel: RwLock<HashMap<ChannelName, Vec<Anomaly>>>,
}

impl AnomalyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation to `channel`, creating the list if needed.
    ///
    /// The annotation is filed under `channel` even if its own
    /// `channel_name` says otherwise; the stored copy is re-homed to match.
    pub fn add(&self, channel: ChannelName, mut anomaly: Anomaly) {
        if anomaly.channel_name() != &channel {
            debug!(
                channel = %channel,
                declared = %anomaly.channel_name(),
                id = %anomaly.id(),
                "Re-homing anomaly to target channel"
            );
            anomaly.set_channel_name(channel.clone());
        }

        debug!(channel = %channel, id = %anomaly.id(), "Adding anomaly");
        write(&self.by_channel)
            .entry(channel)
            .or_default()
            .push(anomaly);
    }

    /// Replace the entry with the same id, keeping its position.
    pub fn update(&self, channel: &str, mut anomaly: Anomaly) -> MutationOutcome {
        let mut by_channel = write(&self.by_channel);

        let slot = by_channel
            .get_mut(channel)
            .and_then(|list| list.iter_mut().find(|a| a.id() == anomaly.id()));

        let outcome = match slot {
            Some(existing) => {
                if anomaly.channel_name().as_str() != channel {
                    anomaly.set_channel_name(channel);
                }
                *existing = anomaly;
                MutationOutcome::Applied
            }
            None => MutationOutcome::NotFound,
        };

        debug!(channel = %channel, outcome = ?outcome, "Updating anomaly");
        outcome
    }

    /// Remove every entry in `channel` with the given id.
    pub fn delete(&self, channel: &str, id: &AnomalyId) -> MutationOutcome {
        let mut by_channel = write(&self.by_channel);

        let removed = match by_channel.get_mut(channel) {
            Some(list) => {
                let before = list.len();
                list.retain(|a| a.id() != id);
                before - list.len()
            }
            None => 0,
        };

        let outcome = if removed > 0 {
            MutationOutcome::Applied
        } else {
            MutationOutcome::NotFound
        };

        debug!(channel = %channel, id = %id, removed, "Deleting anomaly");
        outcome
    }

    /// Annotations of `channel` in insertion order; empty if there are none.
    pub fn for_channel(&self, channel: &str) -> Vec<Anomaly> {
        read(&self.by_channel)
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get(&self, channel: &str, id: &AnomalyId) -> Option<Anomaly> {
        read(&self.by_channel)
            .get(channel)
            .and_then(|list| list.iter().find(|a| a.id() == id))
            .cloned()
    }

    /// Channels with at least one annotation, sorted by name.
    pub fn annotated_channels(&self) -> Vec<ChannelName> {
        let mut channels: Vec<ChannelName> = read(&self.by_channel)
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(channel, _)| channel.clone())
            .collect();
        channels.sort();
        channels
    }

    /// Total number of annotations across all channels.
    pub fn count(&self) -> usize {
        read(&self.by_channel).values().map(Vec::len).sum()
    }

    /// Copy of the non-empty channel lists.
    pub fn to_map(&self) -> HashMap<ChannelName, Vec<Anomaly>> {
        read(&self.by_channel)
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(channel, list)| (channel.clone(), list.clone()))
            .collect()
    }
}
