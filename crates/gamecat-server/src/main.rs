//! gamecat
//!
//! Serves the game catalog over HTTP and offers a few maintenance commands
//! against the same catalog file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gamecat_catalog::Catalog;
use gamecat_config::GamecatConfig;
use gamecat_server::{AppState, router};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "gamecat", version, about = "Game catalog service")]
struct Cli {
    /// Configuration file (TOML). GAMECAT_* environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the catalog as JSON
    List,
    /// Backfill play URLs and reset missing covers
    Migrate,
    /// Print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = GamecatConfig::load_layered(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::List => list(&config),
        Command::Migrate => migrate(&config),
        Command::CheckConfig => check_config(&config),
    }
}

/// Setup logging to stderr so command output stays clean on stdout
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn serve(config: GamecatConfig) -> Result<()> {
    let addr = config.server.listen;
    info!(
        "Starting gamecat ({}) with catalog {}",
        config.environment.name(),
        config.games_file_path().display()
    );
    info!("Games base URL: {}", config.games_base_url());

    let app = router(AppState::from_config(&config));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("  GET    /games          - list games");
    info!("  POST   /games          - add a game");
    info!("  PUT    /games/:title   - update a game");
    info!("  DELETE /games/:title   - delete a game");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn list(config: &GamecatConfig) -> Result<()> {
    let games = Catalog::from_config(config)
        .list_all()
        .context("Failed to read catalog")?;
    println!("{}", serde_json::to_string_pretty(&games)?);
    Ok(())
}

fn migrate(config: &GamecatConfig) -> Result<()> {
    let report = Catalog::from_config(config)
        .migrate()
        .context("Migration failed")?;

    if report.changed() {
        println!(
            "Backfilled {} play URLs and reset {} covers across {} games",
            report.urls_backfilled, report.images_reset, report.records
        );
    } else {
        println!("All {} games already up to date", report.records);
    }
    Ok(())
}

fn check_config(config: &GamecatConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    println!("# games file: {}", config.games_file_path().display());
    println!("# games base URL: {}", config.games_base_url());
    println!("# default image: {}", config.default_image_url());
    Ok(())
}
