//! Selection store
//!
//! Holds the ordered list of selected channels. Callers always submit the
//! full list; there is no incremental add or remove.

use std::collections::HashSet;
use std::sync::RwLock;

use diag_types::ChannelName;

use crate::lock::{read, write};

#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: RwLock<Vec<ChannelName>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection, keeping the first occurrence of any repeated name.
    ///
    /// Returns the number of channels now selected.
    pub fn replace<I, C>(&self, channels: I) -> usize
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelName>,
    {
        let deduped = dedupe(channels.into_iter().map(Into::into));
        let count = deduped.len();
        *write(&self.selected) = deduped;
        count
    }

    pub fn get(&self) -> Vec<ChannelName> {
        read(&self.selected).clone()
    }

    pub fn contains(&self, channel: &str) -> bool {
        read(&self.selected).iter().any(|c| c.as_str() == channel)
    }

    pub fn len(&self) -> usize {
        read(&self.selected).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.selected).is_empty()
    }
}

pub(crate) fn dedupe(channels: impl Iterator<Item = ChannelName>) -> Vec<ChannelName> {
    let mut seen = HashSet::new();
    channels.filter(|c| seen.insert(c.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(store: &SelectionStore) -> Vec<String> {
        store.get().into_iter().map(ChannelName::into_string).collect()
    }

    #[test]
    fn test_starts_empty() {
        let store = SelectionStore::new();
        assert!(store.is_empty());
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_replace_is_wholesale_and_ordered() {
        let store = SelectionStore::new();
        store.replace(["ch3", "ch1"]);
        assert_eq!(names(&store), vec!["ch3", "ch1"]);

        store.replace(["ch2"]);
        assert_eq!(names(&store), vec!["ch2"]);
        assert!(store.contains("ch2"));
        assert!(!store.contains("ch1"));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let store = SelectionStore::new();
        let count = store.replace(["b", "a", "b", "c", "a"]);
        assert_eq!(count, 3);
        assert_eq!(names(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let store = SelectionStore::new();
        store.replace(["ch1"]);
        store.replace(Vec::<ChannelName>::new());
        assert_eq!(store.len(), 0);
    }
}
