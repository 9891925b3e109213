pub mod cli;
pub mod clients;
pub mod config;
pub mod models;
pub mod parser;
pub mod services;

use clap::Parser;
use cli::{Cli, Commands, SyncArgs};
pub use config::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Init) {
        return cli::cmd_init(cli.config);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides();
    config.validate()?;

    init_tracing(&config);
    debug!(catalog = %config.catalog.path, "Configuration loaded");

    match cli.command {
        Commands::Prebuild => cli::cmd_prebuild(&config).await,

        Commands::Sync {
            source,
            output,
            local,
            no_enrich,
            dry_run,
        } => {
            let args = SyncArgs {
                source,
                output,
                local,
                no_enrich,
                dry_run,
            };
            cli::cmd_sync(&config, args).await
        }

        Commands::List { featured, file } => cli::cmd_list(&config, file, featured).await,

        Commands::Repair { file, dry_run } => cli::cmd_repair(&config, file, dry_run).await,

        Commands::Validate { file } => cli::cmd_validate(&config, file).await,

        Commands::Export { file, format } => cli::cmd_export(&config, file, format).await,

        Commands::Init => cli::cmd_init(cli.config),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
