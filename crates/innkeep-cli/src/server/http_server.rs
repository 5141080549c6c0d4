//! Plain HTTP server.

use std::future::{IntoFuture, pending};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::lifecycle::serve_with_shutdown;
use super::{ServerError, ServerResult, shutdown_signal};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// After the signal, in-flight requests get up to the shutdown timeout to
/// complete; the server then stops regardless.
///
/// # Errors
///
/// - [`ServerError::InvalidConfig`] if the configuration does not validate
/// - [`ServerError::BindError`] if the address cannot be bound
/// - [`ServerError::Runtime`] if the server fails while running
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    server_config
        .validate()
        .map_err(|e| ServerError::InvalidConfig(e.to_string()))?;

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %e,
            "Failed to bind to address"
        );
        ServerError::bind_error(server_addr, e)
    })?;

    let shutdown_timeout = server_config.shutdown_timeout();
    let (signal_tx, signal_rx) = oneshot::channel::<()>();

    let graceful = async move {
        shutdown_signal(shutdown_timeout).await;
        let _ = signal_tx.send(());
    };

    let deadline = async move {
        match signal_rx.await {
            Ok(()) => tokio::time::sleep(shutdown_timeout).await,
            Err(_) => pending::<()>().await,
        }
    };

    serve_with_shutdown(&server_config, || async move {
        let server = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(graceful)
            .into_future();

        tokio::select! {
            result = server => result,
            () = deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed, dropping in-flight requests"
                );
                Ok(())
            }
        }
    })
    .await
    .map_err(ServerError::Runtime)
}
