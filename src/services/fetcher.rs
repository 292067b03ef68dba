// src/services/fetcher.rs

//! Document fetchers for the ECO source page.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http::{create_async_client, fetch_bytes};

/// Retrieves the raw bytes of the source document.
///
/// One call is one retrieval: implementations do not retry or cache.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the full document body.
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Location being fetched, for logging.
    fn source(&self) -> &str;
}

/// Fetches the source page over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Vec<u8>> {
        fetch_bytes(&self.client, &self.url).await
    }

    fn source(&self) -> &str {
        &self.url
    }
}

/// Reads the source page from a local file (`file://` URLs).
pub struct FileFetcher {
    path: PathBuf,
    url: String,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let url = format!("file://{}", path.display());
        Self { path, url }
    }
}

#[async_trait]
impl DocumentFetcher for FileFetcher {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| AppError::transport(&self.url, e))
    }

    fn source(&self) -> &str {
        &self.url
    }
}

/// Pick a fetcher for the configured source URL by scheme.
pub fn fetcher_for(config: &SourceConfig) -> Result<Arc<dyn DocumentFetcher>> {
    let url = Url::parse(&config.url)?;
    match url.scheme() {
        "http" | "https" => Ok(Arc::new(HttpFetcher::new(config)?)),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| AppError::config(format!("Invalid file URL: {}", config.url)))?;
            Ok(Arc::new(FileFetcher::new(path)))
        }
        other => Err(AppError::config(format!(
            "Unsupported source URL scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str) -> SourceConfig {
        SourceConfig {
            url: url.to_string(),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn picks_http_fetcher_for_default_url() {
        let fetcher = fetcher_for(&SourceConfig::default()).unwrap();
        assert_eq!(
            fetcher.source(),
            "https://www.chessgames.com/chessecohelp.html"
        );
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert!(matches!(
            fetcher_for(&source("ftp://example.com/eco.html")),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn file_fetcher_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eco.html");
        std::fs::write(&path, "<table></table>").unwrap();

        let url = Url::from_file_path(&path).unwrap();
        let fetcher = fetcher_for(&source(url.as_str())).unwrap();
        assert_eq!(fetcher.fetch().await.unwrap(), b"<table></table>");
    }

    #[tokio::test]
    async fn missing_file_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileFetcher::new(dir.path().join("missing.html"));
        assert!(matches!(
            fetcher.fetch().await,
            Err(AppError::Transport { .. })
        ));
    }
}
