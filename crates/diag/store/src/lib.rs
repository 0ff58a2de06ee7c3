//! Diag Store - Application state for the diagnostic channel workspace
//!
//! One in-memory model behind the anomaly labelling views:
//!
//! - **Hierarchy cache**: lazily loaded, single-flight channel tree
//! - **Selection store**: ordered list of selected channels
//! - **Parameter store**: sampling rate and smoothness
//! - **Anomaly registry**: per-channel annotations addressed by id
//! - **Matched-results cache**: latest cross-channel matches, replaced wholesale
//!
//! The sub-stores share one [`DiagStore`] handle but are otherwise
//! independent. Detection and matching happen elsewhere; this crate only
//! holds their inputs and results.
//!
//! ```no_run
//! use std::sync::Arc;
//! use diag_store::{DiagStore, StoreConfig};
//! use diag_types::Anomaly;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::load(None)?.apply_env_overrides();
//! let store = Arc::new(DiagStore::from_config(&config)?);
//!
//! store.load_hierarchy().await?;
//! store.set_selected_channels(["ip", "bt"]);
//! store.add_anomaly("ip", Anomaly::new("ip", 1).with_field("range", serde_json::json!([0, 5])));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod anomalies;
pub mod config;
pub mod error;
pub mod events;
pub mod hierarchy;
pub mod matched;
pub mod parameters;
pub mod selection;
pub mod source;
pub mod store;

mod lock;

pub use anomalies::{AnomalyRegistry, MutationOutcome};
pub use config::{DisplayDefaults, HierarchySourceConfig, StoreConfig};
pub use error::{ConfigError, HierarchyError, Result, StoreError};
pub use events::{StoreEvent, StoreEventEnvelope};
pub use hierarchy::{HierarchyCache, LoadResult};
pub use matched::MatchedResultsCache;
pub use parameters::ParameterStore;
pub use selection::SelectionStore;
pub use source::{
    FileHierarchySource, HierarchySource, HttpHierarchySource, StaticHierarchySource,
    DEFAULT_HIERARCHY_URL,
};
pub use store::{DiagStore, StoreSnapshot};
