//! Wire types for the streaming envelope protocol and the REST fallback.
//!
//! Every streaming frame is a JSON object with a `type` discriminator:
//!
//! - client → server: `message`, `ping`
//! - server → client: `welcome`, `response`, `job_update`, `typing`, `error`, `pong`
//!
//! The REST fallback reuses [`ChatRequest`] as the `POST /chat` body and
//! answers with a [`ChatReply`].

use serde::{Deserialize, Serialize};

use crate::errors::ChatError;
use crate::models::{null_as_default, HistoryEntry, JobSnapshot, ToolExecution};

/// Body of an outbound chat turn, shared by both transports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    #[serde(rename = "currentJobId")]
    pub current_job_id: Option<String>,
}

/// Response from the REST chat endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "toolExecutions", deserialize_with = "null_as_default")]
    pub tool_executions: Vec<ToolExecution>,
    #[serde(default, rename = "switchedJobId")]
    pub switched_job_id: Option<String>,
}

/// Envelope sent by the client over the socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEnvelope {
    Message(ChatRequest),
    Ping,
}

impl ClientEnvelope {
    pub fn to_json(&self) -> Result<String, ChatError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Envelope pushed by the server over the socket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEnvelope {
    Welcome {
        job: JobSnapshot,
        #[serde(default)]
        message: String,
    },
    Response {
        #[serde(default)]
        text: String,
        #[serde(default, rename = "toolExecutions", deserialize_with = "null_as_default")]
        tool_executions: Vec<ToolExecution>,
        #[serde(default, rename = "switchedJobId")]
        switched_job_id: Option<String>,
    },
    JobUpdate {
        job: JobSnapshot,
    },
    Typing {
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    Pong,
    #[serde(other)]
    Unknown,
}

impl ServerEnvelope {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEnvelope::Welcome { .. } => "welcome",
            ServerEnvelope::Response { .. } => "response",
            ServerEnvelope::JobUpdate { .. } => "job_update",
            ServerEnvelope::Typing { .. } => "typing",
            ServerEnvelope::Error { .. } => "error",
            ServerEnvelope::Pong => "pong",
            ServerEnvelope::Unknown => "unknown",
        }
    }
}

#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    kind: Option<serde_json::Value>,
}

/// Decodes one inbound frame. Unrecognised `type` tags are reported as
/// [`ChatError::UnknownEnvelope`] so callers can log and drop them.
pub fn decode_server(frame: &str) -> Result<ServerEnvelope, ChatError> {
    let envelope: ServerEnvelope = serde_json::from_str(frame)?;
    if matches!(envelope, ServerEnvelope::Unknown) {
        let kind = serde_json::from_str::<TypeTag>(frame)
            .ok()
            .and_then(|tag| tag.kind)
            .map(|kind| match kind {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_default();
        return Err(ChatError::UnknownEnvelope { kind });
    }
    Ok(envelope)
}
