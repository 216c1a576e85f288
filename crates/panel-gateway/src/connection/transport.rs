//! Transport abstraction
//!
//! The session loop only needs to receive frames, send payloads and close.
//! The gateway implements this for axum's `WebSocket`.

use crate::protocol::{Message, Payload};
use async_trait::async_trait;
use axum::extract::ws::{self, CloseFrame, WebSocket};
use std::borrow::Cow;

/// A frame received from the peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Text or binary data frame
    Data(Message),
    /// Ping control frame (answered by the transport)
    Ping,
    /// Pong control frame
    Pong,
    /// Peer started the closing handshake
    Close {
        code: Option<u16>,
        reason: String,
    },
}

impl From<ws::Message> for Frame {
    fn from(message: ws::Message) -> Self {
        match message {
            ws::Message::Text(text) => Self::Data(Message::text(text)),
            ws::Message::Binary(bytes) => Self::Data(Message::binary(bytes)),
            ws::Message::Ping(_) => Self::Ping,
            ws::Message::Pong(_) => Self::Pong,
            ws::Message::Close(frame) => Self::Close {
                code: frame.as_ref().map(|f| f.code),
                reason: frame.map(|f| f.reason.into_owned()).unwrap_or_default(),
            },
        }
    }
}

impl From<Payload> for ws::Message {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Text(text) => Self::Text(text),
            Payload::Binary(bytes) => Self::Binary(bytes),
        }
    }
}

/// Full-duplex message channel to one peer
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next frame; `None` once the stream has ended
    async fn recv(&mut self) -> Option<Result<Frame, axum::Error>>;

    /// Send one payload as a single frame
    async fn send(&mut self, payload: Payload) -> Result<(), axum::Error>;

    /// Start the closing handshake with a close code and reason
    async fn close(&mut self, code: u16, reason: &str) -> Result<(), axum::Error>;

    /// Finish a closing handshake the peer started
    async fn acknowledge_close(&mut self) -> Result<(), axum::Error>;
}

#[async_trait]
impl Transport for WebSocket {
    async fn recv(&mut self) -> Option<Result<Frame, axum::Error>> {
        WebSocket::recv(self)
            .await
            .map(|result| result.map(Frame::from))
    }

    async fn send(&mut self, payload: Payload) -> Result<(), axum::Error> {
        WebSocket::send(self, payload.into()).await
    }

    async fn close(&mut self, code: u16, reason: &str) -> Result<(), axum::Error> {
        let frame = CloseFrame {
            code,
            reason: Cow::Owned(reason.to_owned()),
        };
        WebSocket::send(self, ws::Message::Close(Some(frame))).await
    }

    async fn acknowledge_close(&mut self) -> Result<(), axum::Error> {
        // The reply echoing the peer's frame is queued on read and written
        // out by the next read, which then reports the end of the stream.
        while let Some(frame) = WebSocket::recv(self).await {
            frame?;
        }
        Ok(())
    }
}
