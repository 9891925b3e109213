//! Repair migration command handler

use super::{catalog_path, read_catalog};
use crate::config::Config;
use crate::parser::Layout;
use crate::services::migrate::plan_repair;
use crate::services::sync::write_atomic;
use anyhow::Context;
use std::path::PathBuf;

pub async fn cmd_repair(config: &Config, file: Option<PathBuf>, dry_run: bool) -> anyhow::Result<()> {
    let path = catalog_path(config, file);
    let text = read_catalog(&path).await?;
    let plan = plan_repair(&text, &Layout::from_config(&config.catalog))
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;

    if plan.changes.is_empty() {
        println!("No corrupted fields found.");
    } else {
        println!("Repaired fields ({} total)", plan.changes.len());
        println!("{:-<70}", "");
        for change in &plan.changes {
            println!("{} {}", change.episode_id, change.field);
            println!("  - {}", change.before);
            println!("  + {}", change.after);
        }
    }

    if !plan.dropped.is_empty() {
        println!("Dropped incomplete records: {}", plan.dropped.join(", "));
    }
    if !plan.duplicates.is_empty() {
        println!("Dropped duplicate ids: {}", plan.duplicates.join(", "));
    }

    if !plan.differs_from(&text) {
        println!("{} is already canonical.", path.display());
        return Ok(());
    }

    if dry_run {
        println!("Dry run: {} not written.", path.display());
        return Ok(());
    }

    write_atomic(&path, &plan.output)
        .await
        .with_context(|| format!("Failed to write catalog: {}", path.display()))?;
    println!("Rewrote {} ({} records)", path.display(), plan.episodes.len());

    Ok(())
}
