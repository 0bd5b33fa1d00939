//! Academia HTTP server binary.
//!
//! Initializes the repository, loads the cohort grid configuration, wires up
//! the portal gateway client, and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin academia-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: server host (default: 0.0.0.0)
//! - `PORT`: server port (default: 8080)
//! - `REPOSITORY_TYPE`: storage backend (default: local)
//! - `PORTAL_GATEWAY_URL`: browser-automation gateway (default: http://127.0.0.1:4000)
//! - `TIMETABLES_PATH`: cohort grid TOML; compiled-in default when unset
//! - `RUST_LOG`: log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use academia_backend::db::RepositoryFactory;
use academia_backend::http::{create_router, AppState};
use academia_backend::scrape::HttpPortalClient;
use academia_backend::timetable::{Reconciler, TimetableConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Academia HTTP server");

    let repository = RepositoryFactory::from_env().map_err(|e| anyhow::anyhow!(e))?;
    info!("Repository initialized");

    let config = match env::var("TIMETABLES_PATH") {
        Ok(path) => {
            info!(%path, "Loading cohort grids from file");
            TimetableConfig::from_file(&path)?
        }
        Err(_) => TimetableConfig::builtin(),
    };
    info!(
        cohorts = config.cohorts.len(),
        periods = config.periods.len(),
        "Cohort grids loaded"
    );
    let reconciler = Arc::new(Reconciler::new(config));

    let portal = Arc::new(HttpPortalClient::from_env().map_err(|e| anyhow::anyhow!(e))?);

    let state = AppState::new(repository, portal, reconciler);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
