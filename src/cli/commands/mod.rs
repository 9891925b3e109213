mod export;
mod init;
mod list;
mod repair;
mod sync;
mod validate;

pub use export::cmd_export;
pub use init::cmd_init;
pub use list::cmd_list;
pub use repair::cmd_repair;
pub use sync::{SyncArgs, cmd_prebuild, cmd_sync};
pub use validate::cmd_validate;

use crate::config::Config;
use anyhow::Context;
use std::path::{Path, PathBuf};

fn catalog_path(config: &Config, file: Option<PathBuf>) -> PathBuf {
    file.unwrap_or_else(|| config.catalog_path())
}

async fn read_catalog(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog: {}", path.display()))
}
