//! Hierarchy cache
//!
//! Lazily loads the channel tree once per session. Loads are single-flight:
//! callers that arrive while a fetch is pending join it instead of starting
//! their own, and every joined caller sees the same outcome. A failed fetch
//! leaves the cache unset so the next call retries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use diag_types::ChannelTree;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use crate::error::HierarchyError;
use crate::lock::{lock, read, write};
use crate::source::HierarchySource;

/// Outcome of one load, shared by every caller that awaited it.
pub type LoadResult = Result<Arc<ChannelTree>, HierarchyError>;

type InFlight = Shared<BoxFuture<'static, LoadResult>>;

/// Cache slot for the channel tree plus the single-flight guard.
pub struct HierarchyCache {
    source: Arc<dyn HierarchySource>,
    tree: RwLock<Option<Arc<ChannelTree>>>,
    in_flight: Mutex<Option<InFlight>>,
    fetches: Arc<AtomicUsize>,
}

impl HierarchyCache {
    pub fn new(source: Arc<dyn HierarchySource>) -> Self {
        Self {
            source,
            tree: RwLock::new(None),
            in_flight: Mutex::new(None),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Cached tree, or `None` if no load has succeeded yet.
    pub fn get(&self) -> Option<Arc<ChannelTree>> {
        read(&self.tree).clone()
    }

    pub fn is_loaded(&self) -> bool {
        read(&self.tree).is_some()
    }

    /// Number of fetches actually issued against the source.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Load the tree if it is not cached yet.
    ///
    /// Returns the cached tree without touching the source when present.
    /// Failures are logged and returned; the cache stays unset.
    pub async fn load(&self) -> LoadResult {
        self.load_settling().await.0
    }

    /// Like [`load`](Self::load), also reporting whether this call was the
    /// one that stored a freshly fetched tree.
    pub(crate) async fn load_settling(&self) -> (LoadResult, bool) {
        if let Some(tree) = self.get() {
            return (Ok(tree), false);
        }

        let pending = {
            let mut slot = lock(&self.in_flight);

            // A load may have settled between the check above and taking the guard.
            if let Some(tree) = self.get() {
                return (Ok(tree), false);
            }

            match slot.as_ref() {
                Some(pending) => {
                    debug!(source = %self.source.describe(), "Joining in-flight hierarchy load");
                    pending.clone()
                }
                None => {
                    let pending = self.start_fetch();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;
        let stored = self.settle(&pending, &result) && result.is_ok();
        (result, stored)
    }

    fn start_fetch(&self) -> InFlight {
        let source = Arc::clone(&self.source);
        let fetches = Arc::clone(&self.fetches);

        async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            source.fetch().await.map(Arc::new)
        }
        .boxed()
        .shared()
    }

    /// Publish the outcome of `pending` exactly once.
    ///
    /// Only the first waiter to get here still finds `pending` in the slot;
    /// later waiters see it cleared and leave the cache alone.
    fn settle(&self, pending: &InFlight, result: &LoadResult) -> bool {
        let mut slot = lock(&self.in_flight);
        let is_current = slot
            .as_ref()
            .is_some_and(|current| current.ptr_eq(pending));
        if !is_current {
            return false;
        }
        *slot = None;

        match result {
            Ok(tree) => {
                *write(&self.tree) = Some(Arc::clone(tree));
                info!(
                    source = %self.source.describe(),
                    channels = tree.channel_names().len(),
                    "Channel hierarchy loaded"
                );
            }
            Err(error) => {
                warn!(
                    source = %self.source.describe(),
                    error = %error,
                    "Failed to load channel hierarchy"
                );
            }
        }
        true
    }
}

impl std::fmt::Debug for HierarchyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyCache")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}
