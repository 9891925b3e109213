//! CLI module - Command-line interface for reelsync
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use crate::services::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// reelsync - Episode catalog sync for the series website
/// Keeps the catalog module in step with its canonical copy
#[derive(Parser)]
#[command(name = "reelsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build hook: refresh the catalog, never failing on recoverable errors
    Prebuild,

    /// Fetch, repair, enrich and rewrite the catalog
    Sync {
        /// Remote catalog URL (overrides config)
        #[arg(long)]
        source: Option<String>,
        /// Catalog file to write (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Regenerate from the local file instead of fetching
        #[arg(long, conflicts_with = "source")]
        local: bool,
        /// Skip metadata enrichment
        #[arg(long)]
        no_enrich: bool,
        /// Print the regenerated catalog instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List catalog records in publish order
    #[command(alias = "ls")]
    List {
        /// Only featured records
        #[arg(long)]
        featured: bool,
        /// Catalog file (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Repair corrupted text in the local catalog and rewrite it canonically
    Repair {
        /// Catalog file (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Report changes without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Strictly validate the local catalog; exits non-zero on findings
    Validate {
        /// Catalog file (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Export records as JSON to stdout
    Export {
        /// Catalog file (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
