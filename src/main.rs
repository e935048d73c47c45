use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sites::config::{DatabaseConfig, ServeConfig};
use sites::{SiteService, api, logging};
use tracing::info;

/// sites - REST catalog of sites tagged with URLs and categories
#[derive(Parser)]
#[command(name = "sites")]
#[command(about = "A REST catalog of sites tagged with URLs and categories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve(ServeConfig),
    /// Print every site as JSON
    List(ListCommand),
}

/// Print the catalog
#[derive(Parser)]
struct ListCommand {
    #[command(flatten)]
    database: DatabaseConfig,
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; everything has a flag or a default.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(config) => handle_serve(config).await,
        Commands::List(cmd) => handle_list(&cmd),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    }
}

/// Opens the database and serves the API until Ctrl-C.
async fn handle_serve(config: ServeConfig) -> Result<()> {
    logging::init(config.log_format.into());

    let db_path = config.database.resolve_path()?;
    let db = config.database.open().context("Failed to open database")?;
    let app = api::router(SiteService::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(addr = %config.bind, database = %db_path.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

/// Prints all sites as pretty JSON.
fn handle_list(cmd: &ListCommand) -> Result<()> {
    let db = cmd.database.open().context("Failed to open database")?;
    let service = SiteService::new(db);

    let sites = service.list_sites().context("Failed to list sites")?;
    println!("{}", serde_json::to_string_pretty(&sites)?);

    Ok(())
}
