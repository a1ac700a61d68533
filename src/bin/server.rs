//! Kache Server Binary
//!
//! Starts the TCP server for Kache.

use std::sync::Arc;

use clap::Parser;
use kache::config::DEFAULT_PORT;
use kache::{Config, Server, Table};
use tracing_subscriber::{fmt, EnvFilter};

/// Kache Server
#[derive(Parser, Debug)]
#[command(name = "kache-server")]
#[command(about = "Minimal in-memory key-value server")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value_t = format!("0.0.0.0:{}", DEFAULT_PORT))]
    listen: String,

    /// Port to listen on, replacing the port in --listen
    #[arg(short, long)]
    port: Option<u16>,

    /// Worker threads (defaults to available hardware parallelism)
    #[arg(short, long)]
    workers: Option<usize>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kache=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    // Build config from args
    let mut builder = Config::builder().listen_addr(&args.listen);
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(workers) = args.workers {
        builder = builder.worker_threads(workers);
    }
    let config = builder.build();

    tracing::info!("Kache Server v{}", kache::VERSION);
    tracing::info!("Listen address: {}", config.listen_addr);

    let table = Arc::new(Table::new());

    let server = match Server::bind(&config, table) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
