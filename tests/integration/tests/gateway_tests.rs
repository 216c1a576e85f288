//! Gateway Integration Tests
//!
//! Each test boots a gateway on an ephemeral local port and talks to it with
//! a real WebSocket client.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use integration_tests::{recv_json, recv_text, round_trip, send_text, TestServer};
use panel_common::{AppError, DEFAULT_LISTEN_ADDRESS};
use panel_gateway::protocol::{Message, Payload, Response, ServerIdentity};
use panel_gateway::resolver::{CommandRegistry, Resolver};
use panel_gateway::server::{bind, GatewayState};
use panel_gateway::startup::load_config;
use serde_json::json;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;

fn echo_resolver() -> Arc<dyn Resolver> {
    Arc::new(|msg: &Message| match msg.payload() {
        Payload::Text(text) => Response::text(text.clone()),
        Payload::Binary(bytes) => Response::binary(bytes.clone()),
    })
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_missing_config_serves_on_default_address_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("Panel_Setting").join("config.json"));
    assert_eq!(config.listen_address, DEFAULT_LISTEN_ADDRESS);

    // The default port may be taken on a test machine; serve locally instead.
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    let reply = round_trip(&mut client, "ping").await.unwrap();
    assert_eq!(reply, json!({"cmd": "ping", "ok": true, "data": "pong"}));

    client.close(None).await.unwrap();

    // Listener is unaffected by the closed session
    let mut next = server.connect().await.unwrap();
    assert_eq!(round_trip(&mut next, "ping").await.unwrap()["data"], "pong");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_config_file_address_is_used() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"port": "127.0.0.1:0"}"#).unwrap();

    let config = load_config(file.path());
    assert_eq!(config.listen_address, "127.0.0.1:0");

    let state = GatewayState::new(
        Arc::new(CommandRegistry::with_builtins(ServerIdentity::current())),
        ServerIdentity::current(),
    );
    let server = TestServer::start_on(&config.bind_address(), state)
        .await
        .expect("Failed to start server");
    assert!(server.addr.ip().is_loopback());

    let mut client = server.connect().await.unwrap();
    let reply = round_trip(&mut client, r#"{"cmd":"version"}"#).await.unwrap();
    assert_eq!(reply["data"], json!({"version": "DEV20250816", "protocol": "500"}));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_occupied_address_fails_to_bind() {
    let server = TestServer::start().await.expect("Failed to start server");

    let err = bind(&server.addr.to_string()).await.unwrap_err();
    assert!(matches!(err, AppError::Bind { .. }));

    // The running listener keeps serving
    let mut client = server.connect().await.unwrap();
    assert_eq!(round_trip(&mut client, "ping").await.unwrap()["ok"], true);

    server.shutdown().await.unwrap();
}

// ============================================================================
// Session behaviour
// ============================================================================

#[tokio::test]
async fn test_sequential_messages_get_ordered_responses() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    const N: usize = 50;
    for i in 0..N {
        let request = json!({"cmd": "echo", "id": i, "data": format!("msg-{i}")});
        send_text(&mut client, &request.to_string()).await.unwrap();
    }

    for i in 0..N {
        let reply = recv_json(&mut client).await.unwrap();
        assert_eq!(reply["id"], json!(i));
        assert_eq!(reply["data"], json!(format!("msg-{i}")));
    }

    // Nothing extra was sent, and the close is answered
    client.close(None).await.unwrap();
    let mut close_replies = 0;
    while let Some(frame) = client.next().await {
        let frame = frame.expect("connection dropped without a closing handshake");
        assert!(frame.is_close(), "unexpected frame after replies: {frame:?}");
        close_replies += 1;
    }
    assert_eq!(close_replies, 1);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_client_close_is_answered_with_its_code() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();
    assert_eq!(round_trip(&mut client, "ping").await.unwrap()["data"], "pong");

    client
        .close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "leaving".into(),
        }))
        .await
        .unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timed out waiting for close reply");
    match frame {
        Some(Ok(tungstenite::Message::Close(Some(close)))) => {
            assert_eq!(u16::from(close.code), 1001);
        }
        other => panic!("expected a close reply, got {other:?}"),
    }

    // The listener keeps serving after the handshake
    let mut next = server.connect().await.unwrap();
    assert_eq!(round_trip(&mut next, "ping").await.unwrap()["ok"], true);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_binary_message_gets_response() {
    let server = TestServer::start_with_resolver(echo_resolver())
        .await
        .expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    client
        .send(tungstenite::Message::Binary(vec![1, 2, 3].into()))
        .await
        .unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(frame.into_data().to_vec(), vec![1, 2, 3]);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_resolver_errors_are_payloads() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    let reply = round_trip(&mut client, "reboot").await.unwrap();
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"]["code"], "UNKNOWN_COMMAND");

    let reply = round_trip(&mut client, r#"{"cmd": "#).await.unwrap();
    assert_eq!(reply["error"]["code"], "INVALID_PAYLOAD");

    // The session survives resolver failures
    assert_eq!(round_trip(&mut client, "ping").await.unwrap()["data"], "pong");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fault_on_one_session_does_not_affect_another() {
    let server = TestServer::start_with_resolver(echo_resolver())
        .await
        .expect("Failed to start server");

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    send_text(&mut a, "from a").await.unwrap();
    send_text(&mut b, "from b").await.unwrap();
    assert_eq!(recv_text(&mut a).await.unwrap(), "from a");
    assert_eq!(recv_text(&mut b).await.unwrap(), "from b");

    // Drop A without a closing handshake
    drop(a);

    for i in 0..5 {
        let text = format!("b-{i}");
        send_text(&mut b, &text).await.unwrap();
        assert_eq!(recv_text(&mut b).await.unwrap(), text);
    }

    let mut c = server.connect().await.unwrap();
    send_text(&mut c, "from c").await.unwrap();
    assert_eq!(recv_text(&mut c).await.unwrap(), "from c");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_handshake_does_not_block_later_connections() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = reqwest::get(server.http_url()).await.unwrap();
    assert!(response.status().is_client_error());

    let mut client = server.connect().await.unwrap();
    assert_eq!(round_trip(&mut client, "ping").await.unwrap()["data"], "pong");

    server.shutdown().await.unwrap();
}

// ============================================================================
// Shutdown and timeouts
// ============================================================================

#[tokio::test]
async fn test_shutdown_closes_live_sessions() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();
    assert_eq!(round_trip(&mut client, "ping").await.unwrap()["ok"], true);

    server.shutdown().await.unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timed out waiting for close");
    match frame {
        Some(Ok(tungstenite::Message::Close(Some(close)))) => {
            assert_eq!(u16::from(close.code), 1001);
        }
        other => panic!("expected a close frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_idle_timeout_closes_session() {
    let state = GatewayState::new(echo_resolver(), ServerIdentity::current())
        .with_idle_timeout(Some(Duration::from_millis(200)));
    let server = TestServer::start_on("127.0.0.1:0", state)
        .await
        .expect("Failed to start server");

    let mut client = server.connect().await.unwrap();
    send_text(&mut client, "hello").await.unwrap();
    assert_eq!(recv_text(&mut client).await.unwrap(), "hello");

    let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timed out waiting for close");
    match frame {
        Some(Ok(tungstenite::Message::Close(Some(close)))) => {
            assert_eq!(u16::from(close.code), 1000);
        }
        other => panic!("expected a close frame, got {other:?}"),
    }

    server.shutdown().await.unwrap();
}
