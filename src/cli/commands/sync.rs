//! Sync and prebuild command handlers

use crate::clients::{ClientError, FileContentSource, HttpContentSource, YouTubeClient};
use crate::config::{Config, SourceConfig};
use crate::services::sync::{
    ContentSource, SyncOptions, SyncOutcome, SyncReport, SyncService,
};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub source: Option<String>,
    pub output: Option<PathBuf>,
    pub local: bool,
    pub no_enrich: bool,
    pub dry_run: bool,
}

/// Build hook. Falls back to regenerating the local file when no remote
/// source is configured.
pub async fn cmd_prebuild(config: &Config) -> anyhow::Result<()> {
    let args = SyncArgs {
        local: config.source.url.trim().is_empty(),
        ..SyncArgs::default()
    };
    cmd_sync(config, args).await
}

pub async fn cmd_sync(config: &Config, args: SyncArgs) -> anyhow::Result<()> {
    let mut options = SyncOptions::from_config(config);
    if let Some(output) = args.output {
        options.output = output;
    }
    options.dry_run = args.dry_run;

    let source: Arc<dyn ContentSource> = if args.local {
        Arc::new(FileContentSource::new(options.output.clone()))
    } else {
        let source_config = SourceConfig {
            url: args.source.unwrap_or_else(|| config.source.url.clone()),
            ..config.source.clone()
        };
        if source_config.url.trim().is_empty() {
            anyhow::bail!(
                "No source URL configured. Set source.url, REELSYNC_SOURCE_URL or pass --source"
            );
        }
        Arc::new(
            HttpContentSource::from_config(&source_config)
                .context("Failed to build HTTP client")?,
        )
    };

    let mut service = SyncService::new(source, options);
    if !args.no_enrich
        && let Some(client) = metadata_client(config)?
    {
        service = service.with_metadata(Arc::new(client));
    }

    let report = service.run().await.context("Catalog sync failed")?;
    print_report(&report);
    Ok(())
}

fn metadata_client(config: &Config) -> anyhow::Result<Option<YouTubeClient>> {
    if !config.enrichment.enabled {
        return Ok(None);
    }

    match YouTubeClient::from_config(&config.enrichment) {
        Ok(client) => Ok(Some(client)),
        Err(ClientError::MissingApiKey) => {
            warn!("No YouTube API key configured, skipping enrichment");
            Ok(None)
        }
        Err(err) => Err(err).context("Failed to build metadata client"),
    }
}

fn print_report(report: &SyncReport) {
    match &report.outcome {
        SyncOutcome::Written { path } => {
            println!("Wrote {} records to {}", report.records, path.display());
        }
        SyncOutcome::Unchanged => {
            println!("Catalog unchanged ({} records)", report.records);
        }
        SyncOutcome::DryRun { output } => {
            print!("{output}");
            return;
        }
        SyncOutcome::KeptExisting { stage, reason } => {
            println!("Catalog not updated ({stage} failed: {reason})");
            return;
        }
    }

    let stats = &report.enrichment;
    if stats.queried > 0 || stats.skipped > 0 {
        println!(
            "Enrichment: {} queried, {} enriched, {} not found, {} failed, {} skipped",
            stats.queried, stats.enriched, stats.not_found, stats.failed, stats.skipped
        );
    }
}
