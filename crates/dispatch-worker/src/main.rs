//! Dispatch Worker Daemon

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod http;
mod task_set;
mod tasks;

use config::Config;
use dispatch_client::DispatchClient;
use dispatch_core::WorkerAddr;
use task_set::TaskSet;
use tasks::EchoTask;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::parse();

    // Task set resolved once at startup.
    let tasks = Arc::new(TaskSet::new().with_task("echo", Arc::new(EchoTask)));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let advertise = config
        .advertise_addr
        .clone()
        .unwrap_or_else(|| format!("http://{local_addr}"));

    info!(
        bind_addr = %local_addr,
        advertise = %advertise,
        tasks = ?tasks.names(),
        "Starting dispatch worker"
    );

    // Announce this worker to the controller; keep serving either way.
    if let Some(controller_url) = &config.controller_url {
        let client = DispatchClient::new(controller_url);
        match client
            .register_worker(WorkerAddr::new(advertise.clone()), tasks.names())
            .await
        {
            Ok(()) => {
                info!(controller = %controller_url, "registered with controller");
            }
            Err(err) => {
                warn!(
                    controller = %controller_url,
                    error = %err,
                    "registration failed - continuing unregistered"
                );
            }
        }
    }

    axum::serve(listener, http::create_router(tasks)).await?;

    Ok(())
}
