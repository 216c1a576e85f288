//! Gateway server setup
//!
//! Provides the listener, the upgrade route and the serve loop.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::protocol::ServerIdentity;
use crate::resolver::CommandRegistry;
use axum::{routing::get, Router};
use panel_common::{AppConfig, AppError, AppResult};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Path of the upgrade endpoint
pub const GATEWAY_PATH: &str = "/ws";

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new().route(GATEWAY_PATH, get(gateway_handler))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listening socket
///
/// Failure here is the one unrecoverable error of the gateway.
pub async fn bind(address: &str) -> AppResult<TcpListener> {
    TcpListener::bind(address)
        .await
        .map_err(|e| AppError::bind(address, e))
}

/// Serve connections until `signal` resolves
///
/// When the signal fires the listener stops accepting and every live
/// session is told to close.
pub async fn run_server<F>(listener: TcpListener, state: GatewayState, signal: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(AppError::Server)?;
    tracing::info!(
        identity = %state.identity(),
        "Gateway listening on ws://{}{}",
        addr,
        GATEWAY_PATH
    );

    let app = create_app(state.clone());

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!("Shutting down gateway");
            state.begin_shutdown();
        })
        .await
        .map_err(AppError::Server)
}

/// Wait for Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Run the gateway with the built-in command set
pub async fn run(config: AppConfig, identity: ServerIdentity) -> AppResult<()> {
    let resolver = Arc::new(CommandRegistry::with_builtins(identity));
    let state = GatewayState::new(resolver, identity).with_idle_timeout(config.idle_timeout);

    let address = config.bind_address();
    tracing::info!(
        listen_address = %config.listen_address,
        bind_address = %address,
        "Starting gateway server"
    );
    let listener = bind(&address).await?;

    run_server(listener, state, shutdown_signal()).await
}
