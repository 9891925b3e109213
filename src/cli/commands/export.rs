//! Structured export command handler

use super::{catalog_path, read_catalog};
use crate::config::Config;
use crate::parser::{Layout, RecordParser};
use crate::services::export::{ExportFormat, export_episodes};
use anyhow::Context;
use std::path::PathBuf;

pub async fn cmd_export(
    config: &Config,
    file: Option<PathBuf>,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let path = catalog_path(config, file);
    let text = read_catalog(&path).await?;
    let episodes = RecordParser::new(Layout::from_config(&config.catalog))
        .parse(&text)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;

    export_episodes(&episodes, format, std::io::stdout().lock())
}
