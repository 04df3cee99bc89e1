#![forbid(unsafe_code)]
//! HTTP entrypoint: one in-memory ledger served over the REST API.
//!
//! The ledger lives for the process lifetime; restarting the server starts a
//! fresh chain.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use chaintrace::api::{run_api_server, Node};
use chaintrace::config::load_config;
use chaintrace::ledger::Ledger;

#[derive(Parser)]
#[command(
    name = "chaintrace-server",
    about = "Serve the custody ledger over HTTP"
)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    let ledger = Ledger::new();
    info!(
        api_port = config.network.api_port,
        chain_height = ledger.chain.len(),
        "Starting chaintrace node"
    );

    let node = Arc::new(Node::new(ledger));
    run_api_server(node, &config).await
}
