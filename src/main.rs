use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use social_feed_api::auth::TokenKeys;
use social_feed_api::config::AppConfig;
use social_feed_api::database::{DatabaseManager, MemoryStore, PgPostStore, PostStore};
use social_feed_api::{app, AppState};

#[derive(Parser)]
#[command(name = "social-feed-api")]
#[command(about = "Social feed REST backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on, overriding PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep posts in memory instead of PostgreSQL
        #[arg(long)]
        memory: bool,
    },
    /// Print a signed bearer token for a user id
    Token {
        /// User id to place in the token's claim
        #[arg(short, long)]
        user: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve { port: None, memory: false }) {
        Commands::Serve { port, memory } => serve(config, port, memory).await,
        Commands::Token { user } => {
            let keys = TokenKeys::from_config(&config.security)?;
            println!("{}", keys.issue(user)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, port: Option<u16>, memory: bool) -> Result<()> {
    tracing::info!("Starting Social Feed API in {:?} mode", config.environment);

    let store: Arc<dyn PostStore> = if memory {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let url = config.database_url()?;
        let pool = DatabaseManager::connect(url, &config.database).await?;
        DatabaseManager::ensure_schema(&pool).await?;
        Arc::new(PgPostStore::new(pool))
    };

    let port = port.unwrap_or(config.api.port);
    let state = AppState::new(config, store)?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Social Feed API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
