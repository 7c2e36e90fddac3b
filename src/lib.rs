//! Core of the BuilderSolve chat client.
//!
//! Platform-independent pieces of the browser client: the envelope protocol,
//! the application state and its dispatcher, the connection lifecycle state
//! machine and the markup renderers. The `frontend` crate wires them to a
//! real socket, timers and the DOM.

pub mod config;
pub mod connection;
pub mod errors;
pub mod models;
pub mod protocol;
pub mod render;
pub mod state;
pub mod update;

pub use config::{ClientConfig, TransportKind};
pub use connection::{Command, ConnectionEvent, ConnectionMachine, ConnectionState, SocketSignal};
pub use errors::ChatError;
pub use models::{EstimateLine, HistoryEntry, JobSnapshot, Message, Milestone, Role, ToolExecution};
pub use protocol::{decode_server, ChatReply, ChatRequest, ClientEnvelope, ServerEnvelope};
pub use render::RenderContext;
pub use state::ChatState;
pub use update::{update, Effect, Msg, GENERIC_ERROR};
