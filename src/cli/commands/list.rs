//! List catalog command handler

use super::{catalog_path, read_catalog};
use crate::config::Config;
use crate::models::catalog::Catalog;
use crate::parser::{Layout, RecordParser};
use anyhow::Context;
use std::path::PathBuf;

pub async fn cmd_list(config: &Config, file: Option<PathBuf>, featured_only: bool) -> anyhow::Result<()> {
    let path = catalog_path(config, file);
    let text = read_catalog(&path).await?;
    let episodes = RecordParser::new(Layout::from_config(&config.catalog))
        .parse(&text)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    let catalog = Catalog::from_episodes(episodes);

    if catalog.is_empty() {
        println!("No records in {}.", path.display());
        println!();
        println!("Fetch the catalog with: reelsync sync");
        return Ok(());
    }

    let hero_id = catalog.hero().map(|episode| episode.id.as_str());
    let shown: Vec<_> = catalog
        .chronological()
        .into_iter()
        .filter(|episode| !featured_only || episode.is_featured())
        .collect();

    println!("Catalog ({} of {} records)", shown.len(), catalog.len());
    println!("{:-<70}", "");

    for episode in shown {
        let marker = if Some(episode.id.as_str()) == hero_id {
            "★"
        } else if episode.is_featured() {
            "+"
        } else {
            "•"
        };

        let runtime = episode.runtime.as_deref().unwrap_or("?");
        println!("{} {} [{}]", marker, episode.title, runtime);
        println!(
            "  ID: {} | Published: {} | Category: {}",
            episode.id,
            episode.publish_date.as_deref().unwrap_or("-"),
            episode.category.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("Legend: ★ Hero | + Featured");

    Ok(())
}
