//! donki-cme - DONKI CME connector service
//!
//! Serves the connector's host-facing API (authentication, schema, data) over
//! HTTP. Configured from TOML and environment; takes no command-line flags.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use donki_cme::services::{HttpFetcher, SettingsCredentialStore};
use donki_cme::{AppState, Connector};
use donki_common::config::{self, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Config is read before tracing exists; problems surface once logging is up
    let loaded = config::load_config();
    let toml_config = loaded.as_ref().cloned().unwrap_or_default();

    init_tracing(&toml_config.logging)?;

    info!("Starting donki-cme v{}", env!("CARGO_PKG_VERSION"));
    let toml_config = loaded.context("Failed to load configuration")?;

    let root_folder = config::resolve_root_folder(&toml_config);
    let db_path = config::prepare_root_folder(&root_folder)
        .context("Failed to initialize root folder")?;
    info!("Database: {}", db_path.display());

    let db_pool = donki_cme::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let store = Arc::new(SettingsCredentialStore::new(db_pool));
    donki_cme::config::seed_api_key(store.as_ref(), &toml_config).await?;

    let fetcher = Arc::new(HttpFetcher::new()?);
    let connector = Connector::new(
        store,
        fetcher,
        donki_cme::config::connector_settings(&toml_config),
    );
    info!("Upstream endpoint: {}", connector.settings().endpoint);

    let app = donki_cme::build_router(AppState::new(connector));

    let addr = format!("127.0.0.1:{}", toml_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// RUST_LOG wins over the configured level; a configured file replaces stderr
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("donki_cme={0},donki_common={0}", logging.level)));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}
