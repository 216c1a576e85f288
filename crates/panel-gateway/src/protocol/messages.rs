//! Message and response payloads
//!
//! The gateway imposes no structure on either side of an exchange. A
//! `Message` is whatever the transport delivered as one data frame; a
//! `Response` is built fresh for each dispatch.

use serde::Serialize;

/// Opaque frame contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text frame
    Text(String),
    /// Binary frame
    Binary(Vec<u8>),
}

impl Payload {
    /// Raw bytes of the payload
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Payload as text, if it is valid UTF-8
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    /// Size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload carries no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame kind name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
        }
    }
}

/// One message received on a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: Payload,
}

impl Message {
    /// Create a text message
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
        }
    }

    /// Create a binary message
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Payload::Binary(bytes.into()),
        }
    }

    /// Get the payload
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Message contents as text, if valid UTF-8
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.payload.as_text()
    }
}

impl From<Payload> for Message {
    fn from(payload: Payload) -> Self {
        Self { payload }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Message({}, {} bytes)", self.payload.kind(), self.payload.len())
    }
}

/// The reply to exactly one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Payload,
}

impl Response {
    /// Create a text response
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
        }
    }

    /// Create a binary response
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Payload::Binary(bytes.into()),
        }
    }

    /// Serialize a value into a JSON text response
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(value).map(Self::text)
    }

    /// Get the payload
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consume the response, returning its payload
    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Response({}, {} bytes)", self.payload.kind(), self.payload.len())
    }
}
