//! Error types for diag-store crate.
//!
//! Mutations of the in-memory state never fail; unknown targets are reported
//! through [`crate::MutationOutcome`] instead. Errors here cover the hierarchy
//! fetch, the strict selection path and configuration loading.

use diag_types::ChannelName;
use thiserror::Error;

/// Errors produced while fetching or decoding the channel hierarchy.
///
/// `Clone` because one fetch outcome is handed to every caller that joined
/// the same in-flight load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("hierarchy request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The source answered with a non-success status.
    #[error("hierarchy request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Reading a hierarchy file failed.
    #[error("cannot read hierarchy file {path}: {message}")]
    Io { path: String, message: String },

    /// The document is not valid JSON.
    #[error("hierarchy document is not valid JSON: {0}")]
    Decode(String),

    /// The source could not be constructed from configuration.
    #[error("hierarchy source misconfigured: {0}")]
    Config(String),
}

/// Errors surfaced by [`crate::DiagStore`] operations that can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Loading the hierarchy failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// An operation needs the hierarchy but it has not been loaded yet.
    #[error("channel hierarchy is not loaded")]
    HierarchyNotLoaded,

    /// Selection referenced channels absent from the hierarchy.
    #[error("unknown channels: {}", join_names(.0))]
    UnknownChannels(Vec<ChannelName>),

    /// Configuration rejected while constructing the store.
    ///
    /// Carries the rendered [`ConfigError`], which is not `Clone`.
    #[error("{0}")]
    Config(String),
}

impl From<ConfigError> for StoreError {
    fn from(error: ConfigError) -> Self {
        StoreError::Config(error.to_string())
    }
}

/// Errors loading or validating [`crate::StoreConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn join_names(names: &[ChannelName]) -> String {
    names
        .iter()
        .map(ChannelName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_channels_message() {
        let err = StoreError::UnknownChannels(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "unknown channels: a, b");
    }

    #[test]
    fn test_hierarchy_error_is_transparent() {
        let err: StoreError = HierarchyError::Status {
            url: "http://localhost:5000/api/struct-tree".to_string(),
            status: 500,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "hierarchy request to http://localhost:5000/api/struct-tree returned status 500"
        );
    }

    #[test]
    fn test_config_error_keeps_its_message() {
        let err: StoreError = ConfigError::Invalid("hierarchy url is empty".to_string()).into();
        assert_eq!(
            err,
            StoreError::Config("invalid configuration: hierarchy url is empty".to_string())
        );
    }
}
