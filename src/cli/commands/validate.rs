//! Strict validation command handler

use super::{catalog_path, read_catalog};
use crate::config::Config;
use crate::parser::Layout;
use crate::services::migrate::validate_catalog;
use anyhow::Context;
use std::path::PathBuf;

pub async fn cmd_validate(config: &Config, file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = catalog_path(config, file);
    let text = read_catalog(&path).await?;
    let report = validate_catalog(&text, &Layout::from_config(&config.catalog))
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;

    if report.is_clean() {
        println!("{}: {} records, no problems found.", path.display(), report.records);
        return Ok(());
    }

    println!("{}: {} records", path.display(), report.records);
    println!("{:-<70}", "");

    for finding in &report.findings {
        println!("{}: {}", finding.episode_id, finding.violation);
    }
    for id in &report.incomplete {
        println!("{id}: incomplete record dropped");
    }
    for id in &report.duplicates {
        println!("{id}: duplicate id");
    }
    for id in &report.extra_heroes {
        println!("{id}: additional hero record, only the first is shown");
    }

    let problems = report.findings.len()
        + report.incomplete.len()
        + report.duplicates.len()
        + report.extra_heroes.len();
    anyhow::bail!("{problems} problem(s) found in {}", path.display())
}
