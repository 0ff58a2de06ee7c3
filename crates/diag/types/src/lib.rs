//! Diag Types - Core types for the diagnostic channel workspace
//!
//! These types describe everything an analyst works with while labelling
//! channel data. They carry no I/O and no locking; the state container that
//! owns them lives in `diag-store`.
//!
//! ## Key Concepts
//!
//! - **ChannelTree**: The hierarchy of available channels, kept verbatim as JSON
//! - **ChannelName**: Identifier of a single channel
//! - **Anomaly**: A labelled interval or point on one channel, addressed by id
//! - **MatchedResult**: A correlation record produced by external matching
//! - **SamplingRate / Smoothness**: Display parameters

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod anomaly;
pub mod display;
pub mod ids;
pub mod matched;
pub mod tree;

// Re-export main types
pub use anomaly::Anomaly;
pub use display::{DisplayParameters, SamplingRate, Smoothness};
pub use ids::{AnomalyId, ChannelName};
pub use matched::MatchedResult;
pub use tree::{ChannelNode, ChannelTree};
