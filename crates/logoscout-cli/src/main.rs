use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod hunt;

#[derive(Debug, Parser)]
#[command(name = "logoscout")]
#[command(about = "Storefront logo discovery and validation")]
struct Cli {
    /// Path to the store registry (default: ./config/stores.yaml)
    #[arg(long, global = true)]
    stores: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find one transparent logo per configured store (the default)
    Hunt {
        /// Restrict the hunt to a single store (by id)
        #[arg(long)]
        store: Option<String>,
    },
    /// Print the validated store registry as JSON
    Stores,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = logoscout_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    let stores_path = cli.stores.unwrap_or_else(|| config.stores_path.clone());

    match cli.command {
        Some(Commands::Stores) => {
            let registry = logoscout_core::load_stores(&stores_path)?;
            println!("{}", serde_json::to_string_pretty(&registry.stores)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Hunt { store }) => hunt::run(&config, &stores_path, store.as_deref()).await,
        None => hunt::run(&config, &stores_path, None).await,
    }
}

/// Diagnostics go to stderr so stdout stays a clean JSON report.
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_owned()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
