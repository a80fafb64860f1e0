mod communes;
mod suggest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "civitas-cli")]
#[command(about = "Commune-scoped address suggestions from the command line")]
struct Cli {
    /// Override `CIVITAS_COMMUNES_PATH`
    #[arg(long, global = true)]
    communes_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Suggest addresses inside a commune and print them as JSON
    Suggest {
        /// Commune identifier from the registry (e.g., 99001)
        #[arg(long)]
        commune: String,
        /// Maximum number of suggestions (clamped to 1..=10)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        /// Free-text query; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List communes known to the registry
    Communes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let mut config = civitas_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = cli.communes_path {
        config.communes_path = path;
    }

    match cli.command {
        Commands::Suggest {
            commune,
            limit,
            query,
        } => suggest::run_suggest(&config, &commune, &query.join(" "), limit).await,
        Commands::Communes => communes::run_communes(&config),
    }
}
