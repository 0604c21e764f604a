//! Gift-ID generator service entry point: parses CLI flags, validates
//! the workshop ID, and serves the generate/decode/health HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use giftid::{http, Cli, GiftIdGenerator};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let generator = match GiftIdGenerator::new(cli.workshop_id) {
        Ok(generator) => Arc::new(generator),
        Err(err) => {
            error!(error = %err, workshop_id = cli.workshop_id, "invalid workshop id");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match format!("{}:{}", cli.host, cli.port).parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(error = %err, host = %cli.host, port = cli.port, "invalid bind address");
            std::process::exit(1);
        }
    };

    let app = http::router(generator);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(%addr, workshop_id = cli.workshop_id, "giftid service listening");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}

/// Waits for Ctrl-C so the server can shut down cleanly (exit code 0)
/// instead of being killed mid-request.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install ctrl-c handler");
    }
    info!("shutdown signal received");
}
