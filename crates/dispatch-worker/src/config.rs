//! Worker configuration.

use clap::Parser;

/// Dispatch worker daemon configuration.
#[derive(Debug, Parser)]
#[command(name = "dispatch-worker", about = "Dispatch worker daemon")]
pub struct Config {
    /// HTTP bind address.
    #[arg(long, default_value = "127.0.0.1:8001")]
    pub bind_addr: String,

    /// Base URL the controller should dispatch to.
    ///
    /// Defaults to `http://<bound address>`; set this when the worker sits
    /// behind a different routable address.
    #[arg(long)]
    pub advertise_addr: Option<String>,

    /// Controller base URL to register with at startup. When omitted the
    /// worker starts unregistered and waits to be seeded on the controller
    /// side.
    #[arg(long)]
    pub controller_url: Option<String>,
}
