mod export;
mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bizsearch-cli")]
#[command(about = "Business directory maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load seed records from a JSON file into the database.
    Seed {
        /// Path to the seed file; defaults to SEED_PATH from the environment.
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Dump every business as pretty-printed JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = bizsearch_core::load_app_config()?;
    let pool = bizsearch_db::connect_pool(
        &config.database_url,
        bizsearch_db::PoolConfig::from_app_config(&config),
    )
    .await?;
    bizsearch_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Seed { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(&config.seed_path));
            seed::run_seed(&pool, &path).await?;
        }
        Commands::Export { out } => {
            export::run_export(&pool, out.as_deref()).await?;
        }
    }

    Ok(())
}
