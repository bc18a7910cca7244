//! Dispatch CLI - command line interface for the dispatch controller.

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use dispatch_client::DispatchClient;
use dispatch_core::{SampleId, StartRequest};

/// Dispatch CLI - controller management tool
#[derive(Parser)]
#[command(name = "dispatch")]
#[command(about = "CLI for the dispatch controller", long_about = None)]
struct Cli {
    /// Controller address
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a task against a sample
    Start {
        /// Task name to run
        #[arg(short, long)]
        task: String,

        /// Sample data as a JSON object
        #[arg(short, long, default_value = "{}")]
        data: String,

        /// Sample id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Get execution status
    Status {
        /// Execution id
        id: String,
    },

    /// List registered workers
    Workers,

    /// Check controller health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = DispatchClient::new(&cli.addr);

    match cli.command {
        Commands::Start { task, data, id } => {
            let data: Map<String, Value> = serde_json::from_str(&data)?;
            let mut request = StartRequest::new(task, data);
            if let Some(id) = id {
                request = request.with_id(SampleId::new(id));
            }
            let response = client.start_request(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Status { id } => {
            let execution = client.status(&SampleId::new(id)).await?;
            println!("{}", serde_json::to_string_pretty(&execution)?);
        }
        Commands::Workers => {
            let workers = client.workers().await?;
            println!("{}", serde_json::to_string_pretty(&workers)?);
        }
        Commands::Health => {
            let healthy = client.health().await?;
            println!("{}", if healthy { "ok" } else { "unhealthy" });
        }
    }

    Ok(())
}
