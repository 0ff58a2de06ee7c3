//! Store configuration
//!
//! Where the hierarchy comes from, the initial display parameters and the
//! event channel capacity. Loaded from TOML, with environment overrides for
//! the hierarchy location.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use diag_types::{DisplayParameters, SamplingRate, Smoothness};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HierarchyError};
use crate::source::{
    FileHierarchySource, HierarchySource, HttpHierarchySource, DEFAULT_HIERARCHY_URL,
};

/// Overrides the hierarchy with an HTTP endpoint.
pub const ENV_HIERARCHY_URL: &str = "DIAG_HIERARCHY_URL";

/// Overrides the hierarchy with a JSON file path. Wins over the URL override.
pub const ENV_HIERARCHY_PATH: &str = "DIAG_HIERARCHY_PATH";

/// Top-level configuration for a [`crate::DiagStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Hierarchy source.
    pub hierarchy: HierarchySourceConfig,

    /// Initial display parameters.
    pub display: DisplayDefaults,

    /// Capacity of the change-event broadcast channel.
    pub event_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            hierarchy: HierarchySourceConfig::default(),
            display: DisplayDefaults::default(),
            event_capacity: 64,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file (or no path) yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DIAG_HIERARCHY_URL` / `DIAG_HIERARCHY_PATH` from the process environment.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(
            std::env::var(ENV_HIERARCHY_URL).ok(),
            std::env::var(ENV_HIERARCHY_PATH).ok(),
        )
    }

    fn apply_overrides(mut self, url: Option<String>, path: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            let timeout_secs = match &self.hierarchy {
                HierarchySourceConfig::Http { timeout_secs, .. } => *timeout_secs,
                HierarchySourceConfig::File { .. } => default_timeout_secs(),
            };
            self.hierarchy = HierarchySourceConfig::Http { url, timeout_secs };
        }
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            self.hierarchy = HierarchySourceConfig::File {
                path: PathBuf::from(path),
            };
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be greater than zero".to_string(),
            ));
        }
        self.hierarchy.validate()
    }
}

/// Where the channel tree is fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchySourceConfig {
    /// GET a JSON document from an HTTP endpoint.
    Http {
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Read a JSON document from disk.
    File { path: PathBuf },
}

impl Default for HierarchySourceConfig {
    fn default() -> Self {
        HierarchySourceConfig::Http {
            url: DEFAULT_HIERARCHY_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HierarchySourceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            HierarchySourceConfig::Http { url, timeout_secs } => {
                if url.trim().is_empty() {
                    return Err(ConfigError::Invalid("hierarchy url is empty".to_string()));
                }
                if *timeout_secs == 0 {
                    return Err(ConfigError::Invalid(
                        "hierarchy timeout_secs must be greater than zero".to_string(),
                    ));
                }
            }
            HierarchySourceConfig::File { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid("hierarchy path is empty".to_string()));
                }
            }
        }
        Ok(())
    }

    /// Construct the configured source.
    pub fn build(&self) -> Result<Arc<dyn HierarchySource>, HierarchyError> {
        match self {
            HierarchySourceConfig::Http { url, timeout_secs } => Ok(Arc::new(
                HttpHierarchySource::new(url.clone(), Duration::from_secs(*timeout_secs))?,
            )),
            HierarchySourceConfig::File { path } => {
                Ok(Arc::new(FileHierarchySource::new(path.clone())))
            }
        }
    }
}

/// Initial values for the parameter store.
///
/// Same fields as [`DisplayParameters`], spelled in snake_case for TOML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayDefaults {
    pub sampling_rate: SamplingRate,
    pub smoothness: Smoothness,
}

impl From<DisplayDefaults> for DisplayParameters {
    fn from(defaults: DisplayDefaults) -> Self {
        let DisplayDefaults {
            sampling_rate,
            smoothness,
        } = defaults;
        DisplayParameters {
            sampling_rate,
            smoothness,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(
            config.hierarchy,
            HierarchySourceConfig::Http {
                url: "http://localhost:5000/api/struct-tree".to_string(),
                timeout_secs: 30,
            }
        );
        assert_eq!(config.display.sampling_rate, SamplingRate::DEFAULT);
        assert_eq!(config.event_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_config() {
        // Should return default config when file doesn't exist
        let config = StoreConfig::load(Some(Path::new("/nonexistent/diag.toml"))).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(StoreConfig::load(None).unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_load_file_source_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
event_capacity = 8

[hierarchy]
kind = "file"
path = "static/Data/StructTree.json"

[display]
sampling_rate = 0.2
"#
        )
        .unwrap();

        let config = StoreConfig::load(Some(file.path())).unwrap();
        assert_eq!(
            config.hierarchy,
            HierarchySourceConfig::File {
                path: PathBuf::from("static/Data/StructTree.json"),
            }
        );
        assert_eq!(config.display.sampling_rate, SamplingRate::new(0.2));
        assert_eq!(config.display.smoothness, Smoothness::new(0.0));

        let params = DisplayParameters::from(config.display);
        assert_eq!(params.sampling_rate.value(), 0.2);
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_http_timeout_defaults() {
        let config = StoreConfig::from_toml(
            r#"
[hierarchy]
kind = "http"
url = "http://diag.internal/api/struct-tree"
"#,
        )
        .unwrap();
        assert_eq!(
            config.hierarchy,
            HierarchySourceConfig::Http {
                url: "http://diag.internal/api/struct-tree".to_string(),
                timeout_secs: 30,
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            StoreConfig::from_toml("event_capacity = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StoreConfig::from_toml("[hierarchy]\nkind = \"http\"\nurl = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StoreConfig::from_toml("[hierarchy]\nkind = \"ftp\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::default()
            .apply_overrides(Some("http://other:8080/tree".to_string()), None);
        assert_eq!(
            config.hierarchy,
            HierarchySourceConfig::Http {
                url: "http://other:8080/tree".to_string(),
                timeout_secs: 30,
            }
        );

        let config = config.apply_overrides(
            Some("http://ignored".to_string()),
            Some("/srv/StructTree.json".to_string()),
        );
        assert_eq!(
            config.hierarchy,
            HierarchySourceConfig::File {
                path: PathBuf::from("/srv/StructTree.json"),
            }
        );

        let unchanged = StoreConfig::default().apply_overrides(Some("  ".to_string()), None);
        assert_eq!(unchanged, StoreConfig::default());
    }

    #[tokio::test]
    async fn test_build_sources() {
        let http = HierarchySourceConfig::default().build().unwrap();
        assert_eq!(http.describe(), "http://localhost:5000/api/struct-tree");

        let file = HierarchySourceConfig::File {
            path: PathBuf::from("/srv/StructTree.json"),
        }
        .build()
        .unwrap();
        assert_eq!(file.describe(), "file:///srv/StructTree.json");
    }
}
