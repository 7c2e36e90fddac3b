use thiserror::Error;

/// Top-level client error.
/// Nothing here is fatal: callers log it and, where the user needs to know,
/// turn it into a chat message.
#[derive(Debug, Error)]
pub enum ChatError {
    // ── Protocol errors ──────────────────────────────────────────────────────
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    #[error("Unknown envelope type '{kind}'")]
    UnknownEnvelope { kind: String },

    // ── Transport errors ─────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {status}")]
    HttpStatus { status: u16 },

    #[error("Connection is not open")]
    NotConnected,

    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported server URL scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    // ── Rendering errors ─────────────────────────────────────────────────────
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

impl ChatError {
    pub fn network(message: impl Into<String>) -> Self {
        ChatError::Network(message.into())
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ChatError::MalformedEnvelope(_) | ChatError::UnknownEnvelope { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Network(_) | ChatError::HttpStatus { .. } | ChatError::NotConnected
        )
    }
}
