//! Dispatch Controller Daemon

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod controller;
mod http;
mod registry;
mod state;
mod table;

use config::Config;
use controller::Controller;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load config
    let config = Config::from_env()?;

    // Create shared state and seed the registry
    let state = AppState::new();
    for (addr, capabilities) in &config.seed_workers {
        state.registry.register(addr.clone(), capabilities.clone()).await;
    }

    let controller = Arc::new(Controller::new(state.clone()));

    // Retention sweep for terminal executions
    let retention = chrono::Duration::seconds(config.retention_secs as i64);
    let purge_interval = Duration::from_secs(config.purge_interval_secs.max(1));
    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            ticker.tick().await;
            purge_state.table.purge_terminal(retention).await;
        }
    });

    let router = http::create_router(controller);
    let listener = TcpListener::bind(&config.bind_addr).await?;

    info!(
        bind_addr = %config.bind_addr,
        seed_workers = config.seed_workers.len(),
        retention_secs = config.retention_secs,
        "Starting dispatch controller"
    );

    axum::serve(listener, router).await?;

    Ok(())
}
