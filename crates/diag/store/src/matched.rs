//! Matched-results cache
//!
//! A single slot holding the latest result set from the external matcher.
//! The matcher always recomputes from scratch, so every write replaces the
//! whole set; there is no merge and no per-result identity.

use std::sync::RwLock;

use diag_types::MatchedResult;

use crate::lock::{read, write};

#[derive(Debug, Default)]
pub struct MatchedResultsCache {
    results: RwLock<Vec<MatchedResult>>,
}

impl MatchedResultsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached set, returning how many results it now holds.
    pub fn replace(&self, results: Vec<MatchedResult>) -> usize {
        let count = results.len();
        *write(&self.results) = results;
        count
    }

    pub fn get(&self) -> Vec<MatchedResult> {
        read(&self.results).clone()
    }

    /// Results whose `channel_name` field equals `channel`.
    pub fn for_channel(&self, channel: &str) -> Vec<MatchedResult> {
        read(&self.results)
            .iter()
            .filter(|r| r.channel_name() == Some(channel))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        read(&self.results).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.results).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(channel: &str, start: f64) -> MatchedResult {
        serde_json::from_value(json!({
            "channel_name": channel,
            "start_X": start,
            "end_X": start + 1.0,
            "correlation": 0.9
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_until_set() {
        let cache = MatchedResultsCache::new();
        assert!(cache.get().is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replace_never_merges() {
        let cache = MatchedResultsCache::new();
        let (a, b, c) = (result("ch1", 0.0), result("ch2", 1.0), result("ch3", 2.0));

        cache.replace(vec![a, b]);
        assert_eq!(cache.len(), 2);

        cache.replace(vec![c.clone()]);
        assert_eq!(cache.get(), vec![c]);
    }

    #[test]
    fn test_for_channel_filters_by_name() {
        let cache = MatchedResultsCache::new();
        cache.replace(vec![
            result("ch1", 0.0),
            result("ch2", 1.0),
            result("ch1", 5.0),
            MatchedResult::default(),
        ]);

        let ch1 = cache.for_channel("ch1");
        assert_eq!(ch1.len(), 2);
        assert_eq!(ch1[1].start_x(), Some(5.0));
        assert!(cache.for_channel("ch9").is_empty());
    }
}
