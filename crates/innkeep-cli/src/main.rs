#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use innkeep_server::handler::routes;
use innkeep_server::middleware::{
    RecoveryConfig, RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt,
    RouterSecurityExt, SecurityHeadersConfig,
};
use innkeep_server::service::ServiceState;

use crate::config::Cli;
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "innkeep_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "innkeep_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "innkeep_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "Application terminated with error"
        );

        if let Some(server_error) = error.downcast_ref::<ServerError>() {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error_code = server_error.error_code(),
                recoverable = server_error.is_recoverable(),
                suggestion = server_error.suggestion(),
                "Server error details"
            );
        }
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.init_tracing();
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting innkeep server"
    );

    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;

    let router = create_router(state, &cli);
    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Layers run outermost first: recovery, observability, security, then the
/// routes.
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    let recovery = RecoveryConfig::with_timeout_secs(cli.server.request_timeout);

    routes()
        .with_open_api(&cli.middleware.openapi)
        .with_state(state)
        .with_security(&cli.middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&recovery)
}
