//! Fetch, validate, parse, enrich, serialize and persist the catalog.
//!
//! Every recoverable failure leaves the local catalog untouched, whether or
//! not one exists. Only a catalog that cannot be parsed while no local copy
//! exists fails the run.

use crate::config::Config;
use crate::models::episode::Episode;
use crate::models::metadata::VideoMetadata;
use crate::parser::video_id::is_placeholder;
use crate::parser::{Layout, ParseError, RecordParser, serialize_with};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where the catalog text comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<String>;

    /// Human-readable location for logs and errors.
    fn describe(&self) -> String;
}

/// Per-video metadata lookup. `Ok(None)` means the source does not know the id.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> anyhow::Result<Option<VideoMetadata>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Idle,
    Fetching,
    Parsing,
    Enriching,
    Serializing,
    Persisted,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Enriching => "enriching",
            Self::Serializing => "serializing",
            Self::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Written { path: PathBuf },
    /// The regenerated text equals the local file byte for byte.
    Unchanged,
    DryRun { output: String },
    /// A recoverable failure; nothing was written and the local file, if
    /// any, was not touched.
    KeptExisting { stage: SyncStage, reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub queried: usize,
    pub enriched: usize,
    pub not_found: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    /// Records in the regenerated catalog.
    pub records: usize,
    pub enrichment: EnrichmentStats,
}

impl SyncReport {
    fn kept(stage: SyncStage, reason: String) -> Self {
        Self {
            outcome: SyncOutcome::KeptExisting { stage, reason },
            records: 0,
            enrichment: EnrichmentStats::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Catalog from {location} could not be parsed and there is no local catalog to keep")]
    Unparseable {
        location: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to read local catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub output: PathBuf,
    pub layout: Layout,
    pub required_markers: Vec<String>,
    pub delay: Duration,
    pub placeholder_ids: Vec<String>,
    pub dry_run: bool,
}

impl SyncOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            output: config.catalog_path(),
            layout: Layout::from_config(&config.catalog),
            required_markers: config.source.required_markers.clone(),
            delay: Duration::from_millis(config.enrichment.delay_ms),
            placeholder_ids: config.enrichment.placeholder_ids.clone(),
            dry_run: false,
        }
    }
}

pub struct SyncService {
    source: Arc<dyn ContentSource>,
    metadata: Option<Arc<dyn MetadataSource>>,
    options: SyncOptions,
}

impl SyncService {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, options: SyncOptions) -> Self {
        Self {
            source,
            metadata: None,
            options,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let output_path = &self.options.output;
        let existing = read_existing(output_path).await?;
        let location = self.source.describe();

        info!(stage = %SyncStage::Fetching, source = %location, "Fetching catalog");
        let text = match self.source.fetch().await {
            Ok(text) => text,
            Err(err) => {
                return Ok(Self::keep_existing(
                    existing.is_some(),
                    SyncStage::Fetching,
                    format!("{err:#}"),
                ));
            }
        };

        if let Some(marker) = self.missing_marker(&text) {
            return Ok(Self::keep_existing(
                existing.is_some(),
                SyncStage::Fetching,
                format!("fetched text lacks required marker `{marker}`"),
            ));
        }

        info!(stage = %SyncStage::Parsing, bytes = text.len(), "Parsing catalog");
        let parser = RecordParser::new(self.options.layout.clone());
        let episodes = match parser.parse(&text) {
            Ok(episodes) if episodes.is_empty() => {
                return Ok(Self::keep_existing(
                    existing.is_some(),
                    SyncStage::Parsing,
                    "no complete records in fetched catalog".to_string(),
                ));
            }
            Ok(episodes) => episodes,
            Err(source) if existing.is_none() => {
                return Err(SyncError::Unparseable { location, source });
            }
            Err(err) => {
                return Ok(Self::keep_existing(true, SyncStage::Parsing, err.to_string()));
            }
        };

        let (episodes, enrichment) = self.enrich(episodes).await;

        debug!(stage = %SyncStage::Serializing, records = episodes.len(), "Serializing catalog");
        let output = serialize_with(&episodes, &self.options.layout);
        let records = episodes.len();

        let outcome = if self.options.dry_run {
            SyncOutcome::DryRun { output }
        } else if existing.as_deref() == Some(output.as_str()) {
            info!(path = %output_path.display(), "Catalog unchanged, nothing to write");
            SyncOutcome::Unchanged
        } else {
            write_atomic(output_path, &output)
                .await
                .map_err(|source| SyncError::Write {
                    path: output_path.clone(),
                    source,
                })?;
            info!(
                stage = %SyncStage::Persisted,
                path = %output_path.display(),
                records,
                "Catalog written"
            );
            SyncOutcome::Written {
                path: output_path.clone(),
            }
        };

        Ok(SyncReport {
            outcome,
            records,
            enrichment,
        })
    }

    fn missing_marker(&self, text: &str) -> Option<&str> {
        self.options
            .required_markers
            .iter()
            .map(String::as_str)
            .find(|marker| !text.contains(marker))
    }

    fn keep_existing(has_local: bool, stage: SyncStage, reason: String) -> SyncReport {
        if has_local {
            warn!(stage = %stage, reason = %reason, "Keeping the existing local catalog");
        } else {
            warn!(stage = %stage, reason = %reason, "No local catalog yet, nothing written");
        }
        SyncReport::kept(stage, reason)
    }

    /// Strictly sequential, one query at a time, with the configured pause
    /// between consecutive queries.
    async fn enrich(&self, episodes: Vec<Episode>) -> (Vec<Episode>, EnrichmentStats) {
        let mut stats = EnrichmentStats::default();
        let Some(metadata) = &self.metadata else {
            return (episodes, stats);
        };

        info!(stage = %SyncStage::Enriching, records = episodes.len(), "Enriching catalog");
        let mut enriched = Vec::with_capacity(episodes.len());
        let mut first_query = true;

        for episode in episodes {
            let Some(video_id) = episode.video_id() else {
                debug!(episode_id = %episode.id, "No video id, skipping enrichment");
                stats.skipped += 1;
                enriched.push(episode);
                continue;
            };

            if is_placeholder(&video_id, &episode.video_url, &self.options.placeholder_ids) {
                debug!(episode_id = %episode.id, video_id = %video_id, "Placeholder video, skipping");
                stats.skipped += 1;
                enriched.push(episode);
                continue;
            }

            if !first_query && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
            first_query = false;
            stats.queried += 1;

            match metadata.fetch(&video_id).await {
                Ok(Some(found)) => {
                    stats.enriched += 1;
                    enriched.push(episode.with_metadata(&found));
                }
                Ok(None) => {
                    warn!(episode_id = %episode.id, video_id = %video_id, "Video not found");
                    stats.not_found += 1;
                    enriched.push(episode);
                }
                Err(err) => {
                    warn!(
                        episode_id = %episode.id,
                        video_id = %video_id,
                        error = %format!("{err:#}"),
                        "Metadata query failed, keeping record as is"
                    );
                    stats.failed += 1;
                    enriched.push(episode);
                }
            }
        }

        (enriched, stats)
    }
}

async fn read_existing(path: &Path) -> Result<Option<String>, SyncError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SyncError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes a sibling temp file, then renames it over `path`, so readers see
/// either the old or the new file.
pub async fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file_name = path
        .file_name()
        .map_or_else(|| "catalog".into(), |name| name.to_string_lossy());
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&temp, contents).await?;
    if let Err(err) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(err);
    }

    Ok(())
}
