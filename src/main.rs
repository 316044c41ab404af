// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::action::Action;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::http_api::HttpDashboardApi;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;

    // Create backend client (infrastructure layer)
    let api = Arc::new(HttpDashboardApi::new(&config.backend.base_url));

    // Create dashboard task (application layer)
    let dashboard = DashboardService::spawn(api, &config.dashboard);
    dashboard.send(Action::LoadRoutes).await?;

    // Build router (presentation layer)
    let router = build_router(Arc::new(AppState { dashboard }));

    // Start server
    let addr: SocketAddr = config.server.listen.parse()?;
    tracing::info!(
        "Starting ensaio dashboard on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
