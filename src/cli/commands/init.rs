//! Init command handler

use crate::config::Config;
use std::path::PathBuf;

pub fn cmd_init(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(Config::default_config_path);

    if Config::create_default_if_missing(&path)? {
        println!("Created default config file: {}", path.display());
        println!("Set source.url and enrichment.api_key, or use REELSYNC_SOURCE_URL and YOUTUBE_API_KEY.");
    } else {
        println!("Config file already exists: {}", path.display());
    }

    Ok(())
}
