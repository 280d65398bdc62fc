//! retail-dash: retail order analytics in the terminal.

use retail_dash::cli::Cli;
use retail_dash::config::{Config, ConnectionConfig};
use retail_dash::db::{ConnectionProvider, MockConnector, PostgresConnector};
use retail_dash::error::{DashError, Result};
use retail_dash::logging;
use retail_dash::session::Session;
use retail_dash::tui::{self, App};
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let provider = build_provider(&cli, &config)?;
    let export_dir = cli
        .export_dir
        .clone()
        .unwrap_or_else(|| config.export.resolve_dir());

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| DashError::internal(format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(async {
        if cli.is_headless() {
            tui::headless::run_headless(&cli.headless, provider, export_dir).await
        } else {
            let app = App::new(Session::new(Arc::new(provider)), export_dir);
            tui::run_tui(app).await.map(|()| 0)
        }
    })
}

/// Chooses the database behind the session.
fn build_provider(cli: &Cli, config: &Config) -> Result<ConnectionProvider> {
    if cli.mock_db {
        info!("Using the built-in sample database");
        return Ok(ConnectionProvider::new(MockConnector::retail_sample()));
    }

    let connection = resolve_connection(cli, config)?;
    info!("Connection: {}", connection.display_string());
    Ok(ConnectionProvider::new(PostgresConnector::new(connection)))
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// Precedence:
/// 1. CLI arguments (highest)
/// 2. Named connection from config
/// 3. Default connection from config
/// 4. Environment variables over a local server
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let connection = match cli.db.connection()? {
        Some(connection) => Some(connection),
        None => config.connection(cli.db.named.as_deref())?.cloned(),
    };

    let mut connection = connection.unwrap_or_default();
    connection.apply_env_defaults();
    Ok(connection)
}
