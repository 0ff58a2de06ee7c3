//! Change notifications
//!
//! Every applied mutation is published so views can re-render. Mutations that
//! change nothing (`MutationOutcome::NotFound`) publish nothing.

use chrono::{DateTime, Utc};
use diag_types::{AnomalyId, ChannelName, SamplingRate, Smoothness};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every store event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreEventEnvelope {
    /// Per-store sequence number, starting at 1
    pub sequence: u64,

    /// When the change was applied
    pub timestamp: DateTime<Utc>,

    /// The change itself
    pub event: StoreEvent,
}

/// Store events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The hierarchy was fetched and cached
    HierarchyLoaded { channels: usize },

    /// The selection was replaced
    SelectionChanged { count: usize },

    SamplingRateChanged { sampling_rate: SamplingRate },

    SmoothnessChanged { smoothness: Smoothness },

    AnomalyAdded { channel: ChannelName, id: AnomalyId },

    AnomalyUpdated { channel: ChannelName, id: AnomalyId },

    AnomalyDeleted { channel: ChannelName, id: AnomalyId },

    /// The matched-result set was replaced
    MatchedResultsReplaced { count: usize },
}

impl StoreEvent {
    /// Channel the event concerns, for anomaly events.
    pub fn channel(&self) -> Option<&ChannelName> {
        match self {
            StoreEvent::AnomalyAdded { channel, .. }
            | StoreEvent::AnomalyUpdated { channel, .. }
            | StoreEvent::AnomalyDeleted { channel, .. } => Some(channel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_json_is_tagged() {
        let event = StoreEvent::AnomalyDeleted {
            channel: "ch1".into(),
            id: AnomalyId::from(4),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "anomaly_deleted", "channel": "ch1", "id": 4})
        );
        assert_eq!(event.channel().map(ChannelName::as_str), Some("ch1"));
    }

    #[test]
    fn test_non_anomaly_events_have_no_channel() {
        assert!(StoreEvent::SelectionChanged { count: 2 }.channel().is_none());
    }
}
