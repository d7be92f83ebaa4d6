//! chatgate daemon - relays website chat turns to an LLM completion API

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chatgate::api::ChatServer;
use chatgate::config::{self, Config};
use chatgate::error::Result;
use chatgate::provider::OpenAiProvider;

/// chatgate - HTTP gateway between a website chat widget and an LLM API
#[derive(Parser)]
#[command(name = "chatgate")]
#[command(about = "HTTP gateway between a website chat widget and an LLM completion API")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the chat gateway (default command)
    #[command(name = "serve")]
    Serve,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let env_file = config::load_dotenv();
    init_logging();
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => serve(cli.config).await,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chatgate=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    tracing::info!("Starting chatgate");

    let mut config = Config::load(config_path.as_deref())?;
    config.apply_env_overrides()?;
    config.validate()?;
    tracing::debug!("Config loaded: {:?}", config);

    let provider = OpenAiProvider::new(&config.provider)?;

    ChatServer::new(config, Arc::new(provider)).serve().await?;

    tracing::info!("chatgate stopped");
    Ok(())
}
