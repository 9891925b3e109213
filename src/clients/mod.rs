//! Network and filesystem adapters behind the sync seams.

pub mod content;
pub mod youtube;

pub use content::{FileContentSource, HttpContentSource};
pub use youtube::YouTubeClient;

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} error: {status} - {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No API key configured for the metadata source")]
    MissingApiKey,
}
