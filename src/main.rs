use anyhow::{Context, Result};
use clap::Parser;
use lambda_local::config::{Args, Config};
use lambda_local::functions::builtin_registry;
use lambda_local::Dispatcher;
use lambda_runtime::tracing::{error, info};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    // Same subscriber the Lambda runtime uses, so RUST_LOG and AWS_LAMBDA_LOG_FORMAT apply
    lambda_runtime::tracing::init_default_subscriber();

    let config = Config::try_from(Args::parse())?;
    let handler = builtin_registry().resolve(&config.handler_name, config.mode)?;
    let mode = config.mode;
    let port = config.port;

    let app = Dispatcher::new(config, handler)?.into_router();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Mode: {mode}");
    info!("listening in {port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
