//! OEE Tracker HTTP Server Binary
//!
//! This is the main entry point for the OEE tracker REST API server.
//! It loads configuration, initializes the repository, creates the bootstrap
//! admin, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! OEE_ADMIN_PASSWORD=change-me cargo run --bin oee-server
//! ```
//!
//! # Environment Variables
//!
//! - `OEE_CONFIG`: Path of a TOML config file (default: search for `oee-tracker.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `OEE_ADMIN_USERNAME` / `OEE_ADMIN_PASSWORD`: bootstrap admin account
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oee_tracker::config::AppConfig;
use oee_tracker::db::{self, services};
use oee_tracker::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting OEE Tracker HTTP Server");

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    match config.bootstrap.admin_password.as_deref() {
        Some(password) => {
            let created = services::ensure_bootstrap_admin(
                repository.as_ref(),
                &config.bootstrap.admin_username,
                password,
                chrono::Utc::now(),
            )
            .await?;
            if created.is_some() {
                info!(username = %config.bootstrap.admin_username, "Bootstrap admin created");
            }
        }
        None => warn!("OEE_ADMIN_PASSWORD not set; no admin account is available"),
    }

    let state = AppState::with_config(repository, &config);
    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!(
        category_window_days = config.analytics.category_window_days,
        trend_window_days = config.analytics.trend_window_days,
        "Dashboard windows"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
