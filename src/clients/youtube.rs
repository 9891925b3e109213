use super::ClientError;
use crate::config::EnrichmentConfig;
use crate::models::metadata::VideoMetadata;
use crate::parser::duration::iso8601_to_runtime;
use crate::services::sync::MetadataSource;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<Snippet>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    standard: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Largest rendition the video has.
    fn best(self) -> Option<String> {
        [self.maxres, self.standard, self.high, self.medium, self.default]
            .into_iter()
            .flatten()
            .map(|thumbnail| thumbnail.url)
            .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl VideoItem {
    fn into_metadata(self) -> VideoMetadata {
        let runtime = self
            .content_details
            .and_then(|details| details.duration)
            .and_then(|duration| iso8601_to_runtime(&duration));

        let Some(snippet) = self.snippet else {
            return VideoMetadata {
                runtime,
                ..VideoMetadata::default()
            };
        };

        let publish_date = snippet
            .published_at
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|published| published.date_naive().format("%Y-%m-%d").to_string());

        VideoMetadata {
            title: snippet.title,
            description: snippet.description,
            runtime,
            publish_date,
            thumbnail_url: snippet.thumbnails.best(),
        }
    }
}

/// YouTube Data API v3 `videos` endpoint.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("reelsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &EnrichmentConfig) -> Result<Self, ClientError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ClientError::MissingApiKey)?;

        Self::new(
            config.api_base_url.clone(),
            api_key,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    fn videos_url(&self, video_id: &str) -> Result<Url, ClientError> {
        let endpoint = format!("{}/videos", self.base_url.trim_end_matches('/'));
        Ok(Url::parse_with_params(
            &endpoint,
            &[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ],
        )?)
    }

    /// `None` when the API knows no video with this id.
    pub async fn get_video(&self, video_id: &str) -> Result<Option<VideoMetadata>, ClientError> {
        let url = self.videos_url(video_id)?;
        debug!(video_id, "Querying video metadata");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service: "YouTube API",
                status,
                body,
            });
        }

        let response: VideoListResponse = response.json().await?;
        Ok(response.items.into_iter().next().map(VideoItem::into_metadata))
    }
}

#[async_trait]
impl MetadataSource for YouTubeClient {
    async fn fetch(&self, video_id: &str) -> anyhow::Result<Option<VideoMetadata>> {
        Ok(self.get_video(video_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "kind": "youtube#videoListResponse",
        "items": [{
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "publishedAt": "2024-03-05T14:00:00Z",
                "title": "Grid Down",
                "description": "The regional grid fails.\n\nSubscribe for more.",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg" },
                    "high": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg" }
                }
            },
            "contentDetails": { "duration": "PT15M33S" }
        }]
    }"#;

    #[test]
    fn test_response_to_metadata() {
        let response: VideoListResponse = serde_json::from_str(SAMPLE).unwrap();
        let metadata = response.items.into_iter().next().map(VideoItem::into_metadata).unwrap();

        assert_eq!(metadata.title.as_deref(), Some("Grid Down"));
        assert_eq!(metadata.runtime.as_deref(), Some("15:33"));
        assert_eq!(metadata.publish_date.as_deref(), Some("2024-03-05"));
        assert_eq!(
            metadata.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
    }

    #[test]
    fn test_empty_items() {
        let response: VideoListResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(response.items.is_empty());

        let response: VideoListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_videos_url() {
        let client = YouTubeClient::new(
            "https://www.googleapis.com/youtube/v3/",
            "secret",
            Duration::from_secs(5),
        )
        .unwrap();

        let url = client.videos_url("dQw4w9WgXcQ").unwrap();
        assert_eq!(url.path(), "/youtube/v3/videos");
        assert_eq!(
            url.query(),
            Some("part=snippet%2CcontentDetails&id=dQw4w9WgXcQ&key=secret")
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = EnrichmentConfig::default();
        assert!(matches!(
            YouTubeClient::from_config(&config),
            Err(ClientError::MissingApiKey)
        ));
    }
}
