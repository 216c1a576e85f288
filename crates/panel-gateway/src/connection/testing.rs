//! In-memory transport for session tests

use super::{Frame, Transport};
use crate::protocol::Payload;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Everything the session wrote to the transport
#[derive(Debug, Default)]
pub(crate) struct TransportLog {
    pub sent: Vec<Payload>,
    pub closes: Vec<u16>,
    pub acknowledged_closes: usize,
}

/// Transport fed by a channel; dropping the sender ends the stream
pub(crate) struct ScriptedTransport {
    inbound: mpsc::UnboundedReceiver<Result<Frame, axum::Error>>,
    log: Arc<Mutex<TransportLog>>,
    fail_writes: bool,
}

impl ScriptedTransport {
    /// Make every write fail
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn recv(&mut self) -> Option<Result<Frame, axum::Error>> {
        self.inbound.recv().await
    }

    async fn send(&mut self, payload: Payload) -> Result<(), axum::Error> {
        if self.fail_writes {
            return Err(io_error("broken pipe"));
        }
        self.log.lock().unwrap().sent.push(payload);
        Ok(())
    }

    async fn close(&mut self, code: u16, _reason: &str) -> Result<(), axum::Error> {
        self.log.lock().unwrap().closes.push(code);
        Ok(())
    }

    async fn acknowledge_close(&mut self) -> Result<(), axum::Error> {
        self.log.lock().unwrap().acknowledged_closes += 1;
        Ok(())
    }
}

pub(crate) type PeerSender = mpsc::UnboundedSender<Result<Frame, axum::Error>>;

pub(crate) fn scripted() -> (PeerSender, ScriptedTransport, Arc<Mutex<TransportLog>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let log = Arc::new(Mutex::new(TransportLog::default()));
    let transport = ScriptedTransport {
        inbound: rx,
        log: log.clone(),
        fail_writes: false,
    };
    (tx, transport, log)
}

pub(crate) fn io_error(msg: &str) -> axum::Error {
    axum::Error::new(std::io::Error::other(msg.to_owned()))
}

pub(crate) fn peer_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40000))
}
