use buildersolve_chat::{
    update, ChatState, ClientConfig, ConnectionEvent, ConnectionMachine, Effect, Msg,
    TransportKind,
};
use chrono::Utc;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;

use crate::api;
use crate::ws::ConnectionManager;

/// Shared application state, provided via Leptos context.
///
/// All chat mutations go through [`AppState::dispatch`], which runs the core
/// `update` function and then executes the effects it asks for.
#[derive(Clone, Copy)]
pub struct AppState {
    pub chat: RwSignal<ChatState>,
    /// Contents of the input box.
    pub draft: RwSignal<String>,
    config: StoredValue<ClientConfig>,
    connection: StoredValue<Option<ConnectionManager>, LocalStorage>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide(config: ClientConfig) -> Self {
        let state = Self {
            chat: RwSignal::new(ChatState::new(config.transport, config.history_limit)),
            draft: RwSignal::new(String::new()),
            config: StoredValue::new(config),
            connection: StoredValue::new_local(None),
        };

        provide_context(state);
        state
    }

    /// Opens the streaming connection. A no-op for the REST transport.
    pub fn start(&self) {
        let config = self.config.get_value();
        // REST has no welcome frame, so the job panel stays empty and turns
        // carry no job id until a reply reports `switchedJobId`.
        if config.transport == TransportKind::Rest {
            log::info!("Using REST transport, no socket opened");
            return;
        }

        let url = match config.socket_url() {
            Ok(url) => url,
            Err(e) => {
                log::error!("Cannot derive socket URL: {e}");
                return;
            }
        };

        let machine =
            ConnectionMachine::new(url.as_str(), config.reconnect_delay, config.keep_alive_period);
        let state = *self;
        let manager = ConnectionManager::new(machine, move |event| state.on_connection_event(event));
        self.connection.set_value(Some(manager.clone()));
        manager.connect();
    }

    /// Submit whatever is in the input box.
    pub fn submit(&self) {
        let text = self.draft.get_untracked();
        self.dispatch(Msg::Submit(text));
    }

    pub fn dispatch(&self, msg: Msg) {
        let effects = self
            .chat
            .try_update(|chat| update(chat, msg, Utc::now()))
            .unwrap_or_default();
        self.run(effects);
    }

    fn on_connection_event(&self, event: ConnectionEvent) {
        if let Some(connection) = event.state() {
            self.dispatch(Msg::Connection(connection));
        } else if let ConnectionEvent::Frame(text) = event {
            self.dispatch(Msg::Frame(text));
        }
    }

    fn connection(&self) -> Option<ConnectionManager> {
        self.connection.with_value(|connection| connection.clone())
    }

    fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ClearInput => self.draft.set(String::new()),
                Effect::Send(envelope) => {
                    let sent = self.connection().is_some_and(|c| c.send(&envelope));
                    if !sent {
                        log::warn!("Dropped outbound message: connection not open");
                    }
                }
                Effect::PostChat(request) => {
                    let state = *self;
                    let config = self.config.get_value();
                    spawn_local(async move {
                        let msg = match api::post_chat(&config, &request).await {
                            Ok(reply) => Msg::ChatReplied(reply),
                            Err(e) => {
                                log::error!("Chat request failed: {e}");
                                Msg::ChatFailed(e.to_string())
                            }
                        };
                        state.dispatch(msg);
                    });
                }
                Effect::FetchJob { job_id } => {
                    let state = *self;
                    let config = self.config.get_value();
                    spawn_local(async move {
                        let msg = match api::fetch_job(&config, &job_id).await {
                            Ok(job) => Msg::JobFetched(job),
                            Err(e) => {
                                log::error!("Failed to fetch job {job_id}: {e}");
                                Msg::JobFetchFailed(e.to_string())
                            }
                        };
                        state.dispatch(msg);
                    });
                }
            }
        }
    }
}
