//! Command envelopes
//!
//! Request: `{"cmd": "<name>", "data": <any>?, "id": <any>?}`, or a bare
//! command name as plain text. Text starting with `{` is always an envelope;
//! anything else is a command name, taken verbatim.
//! Reply: `{"cmd", "id"?, "ok": true, "data"}` or
//! `{"cmd"?, "id"?, "ok": false, "error": {"code", "message"}}`.

use super::{ResolveError, ResolveResult};
use crate::protocol::{Message, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded command
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandRequest {
    /// Command name
    pub cmd: String,

    /// Command arguments
    #[serde(default)]
    pub data: Option<Value>,

    /// Client correlation id, echoed back verbatim
    #[serde(default)]
    pub id: Option<Value>,
}

impl CommandRequest {
    /// Create a request with no data
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            data: None,
            id: None,
        }
    }

    /// Decode a message into a command
    pub fn parse(message: &Message) -> ResolveResult<Self> {
        let text = message
            .as_text()
            .ok_or_else(|| ResolveError::invalid_payload("message is not valid UTF-8"))?
            .trim();

        if text.is_empty() {
            return Err(ResolveError::invalid_payload("empty message"));
        }

        let request = if text.starts_with('{') {
            serde_json::from_str::<Self>(text).map_err(ResolveError::invalid_payload)?
        } else {
            Self::new(text)
        };

        if request.cmd.trim().is_empty() {
            return Err(ResolveError::invalid_payload("missing command name"));
        }

        Ok(request)
    }
}

/// Error body inside a failed reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl From<&ResolveError> for ErrorBody {
    fn from(err: &ResolveError) -> Self {
        Self {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

/// Reply to one command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl CommandReply {
    /// Successful reply carrying handler output
    #[must_use]
    pub fn success(request: &CommandRequest, data: Value) -> Self {
        Self {
            cmd: Some(request.cmd.clone()),
            id: request.id.clone(),
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed reply; `request` is `None` when the message never decoded
    #[must_use]
    pub fn failure(request: Option<&CommandRequest>, err: &ResolveError) -> Self {
        Self {
            cmd: request.map(|r| r.cmd.clone()),
            id: request.and_then(|r| r.id.clone()),
            ok: false,
            data: None,
            error: Some(ErrorBody::from(err)),
        }
    }

    /// Render the reply as a text response
    #[must_use]
    pub fn into_response(self) -> Response {
        Response::json(&self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize command reply");
            Response::text(
                r#"{"ok":false,"error":{"code":"INTERNAL_ERROR","message":"reply serialization failed"}}"#,
            )
        })
    }
}
