//! The diagnostic workspace store
//!
//! `DiagStore` is the single authoritative model behind the labelling views.
//! It owns the five sub-stores and is the only dispatch surface: views call
//! the write intents, read through the getters, and subscribe to
//! [`StoreEventEnvelope`]s to know when to re-render.
//!
//! Construct one per session and share it as `Arc<DiagStore>`. All mutations
//! except [`DiagStore::load_hierarchy`] are synchronous and applied in call
//! order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use diag_types::{
    Anomaly, AnomalyId, ChannelName, ChannelTree, DisplayParameters, MatchedResult, SamplingRate,
    Smoothness,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::anomalies::{AnomalyRegistry, MutationOutcome};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::events::{StoreEvent, StoreEventEnvelope};
use crate::hierarchy::HierarchyCache;
use crate::lock::lock;
use crate::matched::MatchedResultsCache;
use crate::parameters::ParameterStore;
use crate::selection::{dedupe, SelectionStore};
use crate::source::HierarchySource;

/// Point-in-time copy of the whole store, for logging and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub taken_at: DateTime<Utc>,
    pub hierarchy: Option<ChannelTree>,
    pub selected_channels: Vec<ChannelName>,
    pub display: DisplayParameters,
    pub anomalies: HashMap<ChannelName, Vec<Anomaly>>,
    pub matched_results: Vec<MatchedResult>,
}

/// Application state container.
pub struct DiagStore {
    hierarchy: HierarchyCache,
    selection: SelectionStore,
    parameters: ParameterStore,
    anomalies: AnomalyRegistry,
    matched: MatchedResultsCache,
    events: broadcast::Sender<StoreEventEnvelope>,
    /// Last published sequence number. Held across each write and its
    /// publication so state, sequence and delivery order agree.
    sequence: Mutex<u64>,
}

impl DiagStore {
    /// Create a store with default parameters.
    pub fn new(source: Arc<dyn HierarchySource>) -> Self {
        let defaults = StoreConfig::default();
        Self::with_parameters(source, defaults.display.into(), defaults.event_capacity)
    }

    /// Create a store from configuration, building the configured source.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let source = config.hierarchy.build()?;
        Ok(Self::with_parameters(
            source,
            config.display.into(),
            config.event_capacity,
        ))
    }

    pub fn with_parameters(
        source: Arc<dyn HierarchySource>,
        display: DisplayParameters,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            hierarchy: HierarchyCache::new(source),
            selection: SelectionStore::new(),
            parameters: ParameterStore::new(display),
            anomalies: AnomalyRegistry::new(),
            matched: MatchedResultsCache::new(),
            events,
            sequence: Mutex::new(0),
        }
    }

    /// Receive every change applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEventEnvelope> {
        self.events.subscribe()
    }

    // ========== Hierarchy ==========

    /// Load the channel hierarchy unless it is already cached.
    ///
    /// Concurrent calls share a single fetch. On failure the cache stays
    /// unset and the error is returned; calling again retries.
    pub async fn load_hierarchy(&self) -> Result<Arc<ChannelTree>> {
        let (result, stored) = self.hierarchy.load_settling().await;
        let tree = result?;
        if stored {
            let mut sequence = lock(&self.sequence);
            self.publish(
                &mut sequence,
                StoreEvent::HierarchyLoaded {
                    channels: tree.channel_names().len(),
                },
            );
        }
        Ok(tree)
    }

    /// Cached hierarchy, or `None` when not loaded.
    pub fn hierarchy(&self) -> Option<Arc<ChannelTree>> {
        self.hierarchy.get()
    }

    pub fn is_hierarchy_loaded(&self) -> bool {
        self.hierarchy.is_loaded()
    }

    /// Number of fetches issued against the hierarchy source so far.
    pub fn hierarchy_fetch_count(&self) -> usize {
        self.hierarchy.fetch_count()
    }

    // ========== Selection ==========

    /// Replace the selection with `channels`, dropping repeated names.
    pub fn set_selected_channels<I, C>(&self, channels: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelName>,
    {
        let mut sequence = lock(&self.sequence);
        let count = self.selection.replace(channels);
        debug!(count, "Selection replaced");
        self.publish(&mut sequence, StoreEvent::SelectionChanged { count });
    }

    /// Replace the selection only if every channel exists in the loaded hierarchy.
    ///
    /// The selection is left untouched on error.
    pub fn set_selected_channels_checked<I, C>(&self, channels: I) -> Result<()>
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelName>,
    {
        let tree = self.hierarchy().ok_or(StoreError::HierarchyNotLoaded)?;
        let known = tree.channel_names();
        let requested = dedupe(channels.into_iter().map(Into::into));

        let unknown: Vec<ChannelName> = requested
            .iter()
            .filter(|c| !known.contains(c))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(StoreError::UnknownChannels(unknown));
        }

        self.set_selected_channels(requested);
        Ok(())
    }

    pub fn selected_channels(&self) -> Vec<ChannelName> {
        self.selection.get()
    }

    pub fn is_selected(&self, channel: &str) -> bool {
        self.selection.contains(channel)
    }

    // ========== Display parameters ==========

    pub fn set_sampling_rate(&self, rate: impl Into<SamplingRate>) {
        let sampling_rate = rate.into();
        let mut sequence = lock(&self.sequence);
        self.parameters.set_sampling_rate(sampling_rate);
        self.publish(&mut sequence, StoreEvent::SamplingRateChanged { sampling_rate });
    }

    pub fn set_smoothness(&self, smoothness: impl Into<Smoothness>) {
        let smoothness = smoothness.into();
        let mut sequence = lock(&self.sequence);
        self.parameters.set_smoothness(smoothness);
        self.publish(&mut sequence, StoreEvent::SmoothnessChanged { smoothness });
    }

    pub fn sampling_rate(&self) -> SamplingRate {
        self.parameters.sampling_rate()
    }

    pub fn smoothness(&self) -> Smoothness {
        self.parameters.smoothness()
    }

    pub fn parameters(&self) -> DisplayParameters {
        self.parameters.get()
    }

    // ========== Anomalies ==========

    /// Append an annotation to a channel. Colliding ids are not detected.
    pub fn add_anomaly(&self, channel: impl Into<ChannelName>, anomaly: Anomaly) {
        let channel = channel.into();
        let id = anomaly.id().clone();
        let mut sequence = lock(&self.sequence);
        self.anomalies.add(channel.clone(), anomaly);
        self.publish(&mut sequence, StoreEvent::AnomalyAdded { channel, id });
    }

    /// Replace the annotation with the same id, keeping its position.
    pub fn update_anomaly(&self, channel: &str, anomaly: Anomaly) -> MutationOutcome {
        let id = anomaly.id().clone();
        let mut sequence = lock(&self.sequence);
        let outcome = self.anomalies.update(channel, anomaly);
        if outcome.is_applied() {
            self.publish(
                &mut sequence,
                StoreEvent::AnomalyUpdated {
                    channel: channel.into(),
                    id,
                },
            );
        }
        outcome
    }

    /// Remove the annotation(s) with `id` from a channel.
    pub fn delete_anomaly(&self, channel: &str, id: &AnomalyId) -> MutationOutcome {
        let mut sequence = lock(&self.sequence);
        let outcome = self.anomalies.delete(channel, id);
        if outcome.is_applied() {
            self.publish(
                &mut sequence,
                StoreEvent::AnomalyDeleted {
                    channel: channel.into(),
                    id: id.clone(),
                },
            );
        }
        outcome
    }

    /// Annotations of a channel; empty when it has none.
    pub fn anomalies_for_channel(&self, channel: &str) -> Vec<Anomaly> {
        self.anomalies.for_channel(channel)
    }

    pub fn anomaly(&self, channel: &str, id: &AnomalyId) -> Option<Anomaly> {
        self.anomalies.get(channel, id)
    }

    pub fn annotated_channels(&self) -> Vec<ChannelName> {
        self.anomalies.annotated_channels()
    }

    pub fn anomaly_count(&self) -> usize {
        self.anomalies.count()
    }

    // ========== Matched results ==========

    /// Replace the whole matched-result set.
    pub fn set_matched_results(&self, results: Vec<MatchedResult>) {
        let mut sequence = lock(&self.sequence);
        let count = self.matched.replace(results);
        debug!(count, "Matched results replaced");
        self.publish(&mut sequence, StoreEvent::MatchedResultsReplaced { count });
    }

    pub fn matched_results(&self) -> Vec<MatchedResult> {
        self.matched.get()
    }

    pub fn matched_results_for_channel(&self, channel: &str) -> Vec<MatchedResult> {
        self.matched.for_channel(channel)
    }

    // ========== Snapshot ==========

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            taken_at: Utc::now(),
            hierarchy: self.hierarchy().map(|tree| (*tree).clone()),
            selected_channels: self.selected_channels(),
            display: self.parameters(),
            anomalies: self.anomalies.to_map(),
            matched_results: self.matched_results(),
        }
    }

    /// Stamp and broadcast `event`. Callers hold the sequence guard.
    fn publish(&self, sequence: &mut u64, event: StoreEvent) {
        *sequence += 1;
        // No subscribers is fine; views may not be attached yet.
        let _ = self.events.send(StoreEventEnvelope {
            sequence: *sequence,
            timestamp: Utc::now(),
            event,
        });
    }
}

impl std::fmt::Debug for DiagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagStore")
            .field("hierarchy", &self.hierarchy)
            .field("selected", &self.selection.len())
            .field("parameters", &self.parameters.get())
            .field("anomalies", &self.anomalies.count())
            .field("matched_results", &self.matched.len())
            .finish()
    }
}
