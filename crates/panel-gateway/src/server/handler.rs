//! WebSocket handler
//!
//! Performs the upgrade handshake and hands each accepted connection to
//! its own session.

use crate::connection::{Connection, Session};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

/// WebSocket gateway handler
///
/// A request that fails the handshake is answered with the rejection status
/// and logged; the listener keeps serving.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!(
                remote_addr = %remote_addr,
                error = %rejection,
                "WebSocket upgrade failed"
            );
            return rejection.into_response();
        }
    };

    ws.on_failed_upgrade(move |error| {
        tracing::warn!(
            remote_addr = %remote_addr,
            error = %error,
            "WebSocket upgrade failed after handshake"
        );
    })
    .on_upgrade(move |socket| handle_socket(state, socket, remote_addr))
}

/// Run a session on an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket, remote_addr: SocketAddr) {
    let connection = Connection::new(remote_addr, socket);
    let session = Session::new(connection, state.resolver(), state.shutdown_receiver())
        .with_idle_timeout(state.idle_timeout());

    session.run().await;
}
