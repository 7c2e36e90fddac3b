use std::time::Duration;

use url::Url;

use crate::errors::ChatError;

pub const DEFAULT_SERVER: &str = "http://localhost:8000/";
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_KEEP_ALIVE_PERIOD: Duration = Duration::from_secs(30);
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const SOCKET_PATH: &str = "ws/chat";
const API_PREFIX: &str = "api/";

/// Which path carries outbound chat turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// Persistent socket with server-pushed envelopes.
    #[default]
    Streaming,
    /// One `POST /chat` per turn, job refreshed through `GET /job/{id}`.
    Rest,
}

impl TransportKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "streaming" | "ws" | "websocket" => Some(TransportKind::Streaming),
            "rest" | "http" => Some(TransportKind::Rest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    server: Url,
    pub transport: TransportKind,
    pub reconnect_delay: Duration,
    pub keep_alive_period: Duration,
    pub history_limit: usize,
}

impl ClientConfig {
    /// Builds a configuration for the backend rooted at `server`
    /// (`http` or `https`).
    pub fn for_server(server: &str) -> Result<Self, ChatError> {
        let mut server = Url::parse(server)?;
        match server.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ChatError::UnsupportedScheme { scheme: other.to_string() });
            }
        }
        // Url::join replaces the last segment unless the base ends with '/'.
        if !server.path().ends_with('/') {
            let path = format!("{}/", server.path());
            server.set_path(&path);
        }

        Ok(Self {
            server,
            transport: TransportKind::default(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            keep_alive_period: DEFAULT_KEEP_ALIVE_PERIOD,
            history_limit: DEFAULT_HISTORY_LIMIT,
        })
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_keep_alive_period(mut self, period: Duration) -> Self {
        self.keep_alive_period = period;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    /// Streaming endpoint: `ws://host/ws/chat`, or `wss` behind TLS.
    pub fn socket_url(&self) -> Result<Url, ChatError> {
        let mut url = self.server.join(SOCKET_PATH)?;
        let scheme = if self.server.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|()| ChatError::UnsupportedScheme { scheme: scheme.to_string() })?;
        Ok(url)
    }

    /// REST endpoint under `/api`, e.g. `api_url("chat")`.
    pub fn api_url(&self, path: &str) -> Result<Url, ChatError> {
        Ok(self.server.join(API_PREFIX)?.join(path.trim_start_matches('/'))?)
    }

    pub fn chat_url(&self) -> Result<Url, ChatError> {
        self.api_url("chat")
    }

    pub fn job_url(&self, job_id: &str) -> Result<Url, ChatError> {
        let mut url = self.api_url("job/")?;
        url.path_segments_mut()
            .map_err(|()| ChatError::UnsupportedScheme { scheme: "cannot-be-a-base".to_string() })?
            .pop_if_empty()
            .push(job_id);
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: Url::parse(DEFAULT_SERVER).expect("default server URL is valid"),
            transport: TransportKind::default(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            keep_alive_period: DEFAULT_KEEP_ALIVE_PERIOD,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_server_scheme() {
        let config = ClientConfig::for_server("https://jobs.example.com/builder").unwrap();
        assert_eq!(config.socket_url().unwrap().as_str(), "wss://jobs.example.com/builder/ws/chat");
        assert_eq!(config.chat_url().unwrap().as_str(), "https://jobs.example.com/builder/api/chat");
        assert_eq!(
            config.job_url("4ZppggAAJuJMZNB8f2ZT").unwrap().as_str(),
            "https://jobs.example.com/builder/api/job/4ZppggAAJuJMZNB8f2ZT"
        );
    }

    #[test]
    fn default_targets_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.socket_url().unwrap().as_str(), "ws://localhost:8000/ws/chat");
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.keep_alive_period, Duration::from_secs(30));
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.transport, TransportKind::Streaming);
    }

    #[test]
    fn job_ids_are_path_escaped() {
        let config = ClientConfig::default();
        assert_eq!(
            config.job_url("a/b c").unwrap().as_str(),
            "http://localhost:8000/api/job/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_non_http_servers() {
        assert!(matches!(
            ClientConfig::for_server("ftp://example.com"),
            Err(ChatError::UnsupportedScheme { .. })
        ));
        assert!(ClientConfig::for_server("not a url").is_err());
    }
}
