//! Hierarchy sources
//!
//! Where the channel tree comes from is deployment configuration. The cache
//! only sees the [`HierarchySource`] trait; the HTTP and file sources cover the
//! two deployments in use (the diagnostic API route and a static JSON file).

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use diag_types::ChannelTree;
use reqwest::Client;
use tracing::debug;

use crate::error::HierarchyError;

/// Route served by the diagnostic platform API.
pub const DEFAULT_HIERARCHY_URL: &str = "http://localhost:5000/api/struct-tree";

/// Something that can produce the channel tree document.
#[async_trait]
pub trait HierarchySource: Send + Sync {
    /// Fetch and decode the document. Called at most once per load attempt.
    async fn fetch(&self) -> Result<ChannelTree, HierarchyError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Fetches the tree with an HTTP GET.
pub struct HttpHierarchySource {
    client: Client,
    url: String,
}

impl HttpHierarchySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, HierarchyError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HierarchyError::Config(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HierarchySource for HttpHierarchySource {
    async fn fetch(&self) -> Result<ChannelTree, HierarchyError> {
        debug!(url = %self.url, "Requesting channel hierarchy");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| HierarchyError::Http {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HierarchyError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| HierarchyError::Http {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| HierarchyError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the tree from a JSON file.
pub struct FileHierarchySource {
    path: PathBuf,
}

impl FileHierarchySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HierarchySource for FileHierarchySource {
    async fn fetch(&self) -> Result<ChannelTree, HierarchyError> {
        debug!(path = %self.path.display(), "Reading channel hierarchy");

        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|e| HierarchyError::Io {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        serde_json::from_slice(&contents).map_err(|e| HierarchyError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Serves a tree that is already in memory.
pub struct StaticHierarchySource {
    tree: ChannelTree,
}

impl StaticHierarchySource {
    pub fn new(tree: ChannelTree) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl HierarchySource for StaticHierarchySource {
    async fn fetch(&self) -> Result<ChannelTree, HierarchyError> {
        Ok(self.tree.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diag_types::ChannelName;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_source_decodes_tree() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/struct-tree"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"label": "ip", "path": "/Data/ip.json"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/api/struct-tree", server.uri());
        let source = HttpHierarchySource::new(url.clone(), Duration::from_secs(5)).unwrap();
        assert_eq!(source.describe(), url);

        let tree = source.fetch().await.unwrap();
        assert_eq!(tree.channel_names(), vec![ChannelName::from("ip")]);
    }

    #[tokio::test]
    async fn test_http_source_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let url = format!("{}/api/struct-tree", server.uri());
        let source = HttpHierarchySource::new(url.clone(), Duration::from_secs(5)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert_eq!(err, HierarchyError::Status { url, status: 500 });
    }

    #[tokio::test]
    async fn test_http_source_rejects_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let source =
            HttpHierarchySource::new(format!("{}/tree", server.uri()), Duration::from_secs(5))
                .unwrap();

        assert!(matches!(
            source.fetch().await,
            Err(HierarchyError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "root", "children": [{{"name": "bt"}}]}}"#).unwrap();

        let source = FileHierarchySource::new(file.path());
        let tree = source.fetch().await.unwrap();
        assert!(tree.contains_channel("bt"));
        assert!(source.describe().starts_with("file://"));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileHierarchySource::new("/nonexistent/StructTree.json");
        assert!(matches!(
            source.fetch().await,
            Err(HierarchyError::Io { .. })
        ));
    }
}
