use super::ClientError;
use crate::config::SourceConfig;
use crate::services::sync::ContentSource;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Fetches the canonical catalog over plain HTTP GET.
#[derive(Clone)]
pub struct HttpContentSource {
    client: Client,
    url: String,
}

impl HttpContentSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("reelsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, ClientError> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    pub async fn fetch_text(&self) -> Result<String, ClientError> {
        debug!(url = %self.url, "Fetching catalog");
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service: "Catalog source",
                status,
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        Ok(self.fetch_text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the catalog from disk, used for `--local` runs.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    path: PathBuf,
}

impl FileContentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| {
                ClientError::Io {
                    path: self.path.clone(),
                    source,
                }
                .into()
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
