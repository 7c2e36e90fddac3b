use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::TransportKind;
use crate::connection::ConnectionState;
use crate::models::{JobSnapshot, Role};
use crate::protocol::{decode_server, ChatReply, ChatRequest, ClientEnvelope, ServerEnvelope};
use crate::state::ChatState;

/// Shown when the backend reports a failure without saying what it was.
pub const GENERIC_ERROR: &str = "Sorry, something went wrong. Please try again.";

/// Inputs to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The connection manager changed state.
    Connection(ConnectionState),
    /// Raw text frame from the socket.
    Frame(String),
    /// Already-decoded envelope.
    Envelope(ServerEnvelope),
    /// User submitted the input box.
    Submit(String),
    /// REST fallback: `POST /chat` answered.
    ChatReplied(ChatReply),
    /// REST fallback: `POST /chat` failed or returned non-2xx.
    ChatFailed(String),
    /// REST fallback: `GET /job/{id}` answered.
    JobFetched(JobSnapshot),
    /// REST fallback: `GET /job/{id}` failed.
    JobFetchFailed(String),
}

/// Work the platform must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Send(ClientEnvelope),
    PostChat(ChatRequest),
    FetchJob { job_id: String },
    ClearInput,
}

/// Applies one message to the state and returns the effects to run.
pub fn update(state: &mut ChatState, msg: Msg, now: DateTime<Utc>) -> Vec<Effect> {
    match msg {
        Msg::Connection(connection) => {
            state.set_connection(connection);
            // The session that owed us a reply is gone with the socket.
            if connection == ConnectionState::Closed {
                state.set_typing(false);
            }
            Vec::new()
        }
        Msg::Frame(text) => match decode_server(&text) {
            Ok(envelope) => apply_envelope(state, envelope, now),
            Err(e) => {
                warn!("dropping inbound frame: {e}");
                Vec::new()
            }
        },
        Msg::Envelope(envelope) => apply_envelope(state, envelope, now),
        Msg::Submit(input) => submit(state, input, now),
        Msg::ChatReplied(reply) => {
            state.set_typing(false);
            state.append(Role::Model, reply.text, reply.tool_executions, now);
            match reply.switched_job_id {
                Some(job_id) if state.current_job_id() != Some(job_id.as_str()) => {
                    debug!(%job_id, "agent switched job, fetching snapshot");
                    vec![Effect::FetchJob { job_id }]
                }
                _ => Vec::new(),
            }
        }
        Msg::ChatFailed(reason) => {
            warn!("chat request failed: {reason}");
            state.set_typing(false);
            state.append(Role::Model, GENERIC_ERROR, Vec::new(), now);
            Vec::new()
        }
        Msg::JobFetched(job) => {
            state.replace_job(job);
            Vec::new()
        }
        Msg::JobFetchFailed(reason) => {
            warn!("job fetch failed: {reason}");
            state.append(Role::Model, GENERIC_ERROR, Vec::new(), now);
            Vec::new()
        }
    }
}

fn apply_envelope(state: &mut ChatState, envelope: ServerEnvelope, now: DateTime<Utc>) -> Vec<Effect> {
    debug!(kind = envelope.kind(), "inbound envelope");
    match envelope {
        ServerEnvelope::Welcome { job, message } => {
            state.replace_job(job);
            state.append(Role::Model, message, Vec::new(), now);
        }
        ServerEnvelope::Response { text, tool_executions, .. } => {
            state.set_typing(false);
            state.append(Role::Model, text, tool_executions, now);
        }
        ServerEnvelope::JobUpdate { job } => state.replace_job(job),
        ServerEnvelope::Typing { is_typing } => state.set_typing(is_typing),
        ServerEnvelope::Error { message } => {
            state.set_typing(false);
            let text = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ERROR.to_string());
            state.append(Role::Model, text, Vec::new(), now);
        }
        ServerEnvelope::Pong => {}
        ServerEnvelope::Unknown => warn!("dropping envelope of unknown type"),
    }
    Vec::new()
}

fn submit(state: &mut ChatState, input: String, now: DateTime<Utc>) -> Vec<Effect> {
    let text = input.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if !state.can_send() {
        debug!(connection = ?state.connection(), "submit ignored, connection not open");
        return Vec::new();
    }

    let text = text.to_string();
    state.append(Role::User, text.clone(), Vec::new(), now);
    let request = ChatRequest {
        message: text,
        history: state.history(),
        current_job_id: state.current_job_id().map(str::to_string),
    };
    state.set_typing(true);

    let send = match state.transport() {
        TransportKind::Streaming => Effect::Send(ClientEnvelope::Message(request)),
        TransportKind::Rest => Effect::PostChat(request),
    };
    vec![Effect::ClearInput, send]
}
