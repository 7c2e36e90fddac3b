use chrono::{DateTime, Utc};

use crate::config::TransportKind;
use crate::connection::ConnectionState;
use crate::models::{HistoryEntry, JobSnapshot, Message, Role, ToolExecution};

/// In-memory application state: the conversation log and the job in focus.
///
/// Only the dispatcher (`update`) mutates it; renderers read it through the
/// accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    messages: Vec<Message>,
    current_job: Option<JobSnapshot>,
    typing: bool,
    connection: ConnectionState,
    transport: TransportKind,
    history_limit: usize,
    next_message_seq: u64,
}

impl ChatState {
    pub fn new(transport: TransportKind, history_limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            current_job: None,
            typing: false,
            connection: ConnectionState::Connecting,
            transport,
            history_limit,
            next_message_seq: 1,
        }
    }

    // --- Accessors ---

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn current_job(&self) -> Option<&JobSnapshot> {
        self.current_job.as_ref()
    }

    pub fn current_job_id(&self) -> Option<&str> {
        self.current_job.as_ref().map(|job| job.document_id.as_str())
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Whether the input box should accept a new turn.
    pub fn can_send(&self) -> bool {
        match self.transport {
            TransportKind::Streaming => self.connection == ConnectionState::Open,
            TransportKind::Rest => true,
        }
    }

    /// The last `history_limit` non-system messages, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut recent: Vec<HistoryEntry> = self
            .messages
            .iter()
            .rev()
            .filter(|m| m.role != Role::System)
            .take(self.history_limit)
            .map(HistoryEntry::from)
            .collect();
        recent.reverse();
        recent
    }

    // --- Mutators ---

    pub(crate) fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        tool_executions: Vec<ToolExecution>,
        now: DateTime<Utc>,
    ) -> &Message {
        let message = Message {
            id: format!("msg-{}", self.next_message_seq),
            role,
            content: content.into(),
            timestamp: now,
            tool_executions,
        };
        self.next_message_seq += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Replaces the job in focus. The previous snapshot is discarded.
    pub(crate) fn replace_job(&mut self, job: JobSnapshot) {
        self.current_job = Some(job);
    }

    pub(crate) fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub(crate) fn set_connection(&mut self, connection: ConnectionState) {
        self.connection = connection;
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(TransportKind::default(), crate::config::DEFAULT_HISTORY_LIMIT)
    }
}
