//! Connection lifecycle as a pure state machine.
//!
//! [`ConnectionMachine`] never touches a socket or a timer itself. Each input
//! returns the [`Command`]s the platform runtime must execute, which keeps the
//! reconnect-forever loop and the keep-alive probe testable on the host.
//!
//! ```text
//! Connecting --Opened--> Open --Errored/Closed--> Closed --reconnect due--> Connecting
//!      \______________Errored/Closed______________/
//! ```
//!
//! Every `connect()` starts a new attempt. Socket signals tagged with an older
//! attempt are ignored, so a late `close` from a superseded socket can never
//! arm a second reconnect timer.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::errors::ChatError;
use crate::protocol::ClientEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting…",
            ConnectionState::Open => "Connected",
            ConnectionState::Closed => "Reconnecting…",
        }
    }
}

/// What the socket reported for a given attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketSignal {
    Opened,
    Frame(String),
    Errored,
    Closed,
}

/// Events observable by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connecting,
    Connected,
    Disconnected,
    Frame(String),
}

impl ConnectionEvent {
    /// The state change carried by this event, if any.
    pub fn state(&self) -> Option<ConnectionState> {
        match self {
            ConnectionEvent::Connecting => Some(ConnectionState::Connecting),
            ConnectionEvent::Connected => Some(ConnectionState::Open),
            ConnectionEvent::Disconnected => Some(ConnectionState::Closed),
            ConnectionEvent::Frame(_) => None,
        }
    }
}

/// Side effects for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenSocket { attempt: u64, url: String },
    CloseSocket,
    Write(String),
    ArmReconnect(Duration),
    ArmKeepAlive(Duration),
    CancelKeepAlive,
    Emit(ConnectionEvent),
}

#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    url: String,
    reconnect_delay: Duration,
    keep_alive_period: Duration,
    state: ConnectionState,
    attempt: u64,
    reconnect_pending: bool,
    keep_alive_armed: bool,
    started: bool,
}

impl ConnectionMachine {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration, keep_alive_period: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            keep_alive_period,
            state: ConnectionState::Closed,
            attempt: 0,
            reconnect_pending: false,
            keep_alive_armed: false,
            started: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    pub fn keep_alive_armed(&self) -> bool {
        self.keep_alive_armed
    }

    /// Starts a new connection attempt. A no-op while one is already open or
    /// in flight.
    pub fn connect(&mut self) -> Vec<Command> {
        if self.started && self.state != ConnectionState::Closed {
            debug!(state = ?self.state, "connect ignored, attempt already active");
            return Vec::new();
        }
        self.started = true;
        self.attempt += 1;
        self.reconnect_pending = false;
        self.state = ConnectionState::Connecting;
        info!(attempt = self.attempt, url = %self.url, "opening connection");
        vec![
            Command::OpenSocket { attempt: self.attempt, url: self.url.clone() },
            Command::Emit(ConnectionEvent::Connecting),
        ]
    }

    pub fn on_socket(&mut self, attempt: u64, signal: SocketSignal) -> Vec<Command> {
        if attempt != self.attempt {
            debug!(attempt, current = self.attempt, ?signal, "ignoring signal from superseded socket");
            return Vec::new();
        }

        match (self.state, signal) {
            (ConnectionState::Connecting, SocketSignal::Opened) => {
                info!(attempt, "connection open");
                self.state = ConnectionState::Open;
                self.keep_alive_armed = true;
                vec![
                    Command::ArmKeepAlive(self.keep_alive_period),
                    Command::Emit(ConnectionEvent::Connected),
                ]
            }
            (ConnectionState::Open, SocketSignal::Frame(text)) => {
                vec![Command::Emit(ConnectionEvent::Frame(text))]
            }
            (ConnectionState::Connecting | ConnectionState::Open, SocketSignal::Errored | SocketSignal::Closed) => {
                self.on_terminal()
            }
            (ConnectionState::Closed, _) => Vec::new(),
            (state, signal) => {
                warn!(?state, ?signal, "unexpected socket signal");
                Vec::new()
            }
        }
    }

    /// The reconnect timer fired.
    pub fn reconnect_due(&mut self) -> Vec<Command> {
        if !self.reconnect_pending {
            return Vec::new();
        }
        self.reconnect_pending = false;
        self.connect()
    }

    /// The keep-alive timer fired.
    pub fn keep_alive_due(&mut self) -> Vec<Command> {
        if self.state != ConnectionState::Open {
            return Vec::new();
        }
        match ClientEnvelope::Ping.to_json() {
            Ok(json) => vec![Command::Write(json)],
            Err(e) => {
                warn!("failed to encode keep-alive probe: {e}");
                Vec::new()
            }
        }
    }

    /// Serialises `envelope` for the open socket.
    pub fn encode(&self, envelope: &ClientEnvelope) -> Result<Command, ChatError> {
        if self.state != ConnectionState::Open {
            return Err(ChatError::NotConnected);
        }
        Ok(Command::Write(envelope.to_json()?))
    }

    fn on_terminal(&mut self) -> Vec<Command> {
        warn!(
            attempt = self.attempt,
            delay_ms = self.reconnect_delay.as_millis() as u64,
            "connection lost, scheduling reconnect"
        );
        self.state = ConnectionState::Closed;

        let mut commands = Vec::with_capacity(4);
        if self.keep_alive_armed {
            self.keep_alive_armed = false;
            commands.push(Command::CancelKeepAlive);
        }
        commands.push(Command::CloseSocket);
        if !self.reconnect_pending {
            self.reconnect_pending = true;
            commands.push(Command::ArmReconnect(self.reconnect_delay));
        }
        commands.push(Command::Emit(ConnectionEvent::Disconnected));
        commands
    }
}
