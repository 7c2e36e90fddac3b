use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use buildersolve_chat::{
    ClientEnvelope, Command, ConnectionEvent, ConnectionMachine, SocketSignal,
};
use gloo_timers::callback::{Interval, Timeout};
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

type Listener = Rc<dyn Fn(ConnectionEvent)>;

/// Callbacks attached to the current socket. Kept alive for as long as the
/// socket is, dropped once a newer attempt replaces it.
struct SocketHandlers {
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut()>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

struct Inner {
    machine: ConnectionMachine,
    socket: Option<WebSocket>,
    handlers: Option<SocketHandlers>,
    reconnect: Option<Timeout>,
    keep_alive: Option<Interval>,
    listener: Listener,
}

/// Owns the single browser `WebSocket` and its timers, executing the
/// commands produced by [`ConnectionMachine`].
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Rc<RefCell<Inner>>,
}

impl ConnectionManager {
    pub fn new(machine: ConnectionMachine, listener: impl Fn(ConnectionEvent) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                machine,
                socket: None,
                handlers: None,
                reconnect: None,
                keep_alive: None,
                listener: Rc::new(listener),
            })),
        }
    }

    pub fn connect(&self) {
        let commands = self.inner.borrow_mut().machine.connect();
        self.run(commands);
    }

    /// Writes `envelope` if the socket is open. Returns `false` otherwise.
    pub fn send(&self, envelope: &ClientEnvelope) -> bool {
        let command = self.inner.borrow().machine.encode(envelope);
        match command {
            Ok(command) => {
                self.run(vec![command]);
                true
            }
            Err(e) => {
                log::debug!("send skipped: {e}");
                false
            }
        }
    }

    fn on_socket(&self, attempt: u64, signal: SocketSignal) {
        let commands = self.inner.borrow_mut().machine.on_socket(attempt, signal);
        self.run(commands);
    }

    fn reconnect_due(&self) {
        let commands = self.inner.borrow_mut().machine.reconnect_due();
        self.run(commands);
    }

    fn keep_alive_due(&self) {
        let commands = self.inner.borrow_mut().machine.keep_alive_due();
        self.run(commands);
    }

    fn run(&self, commands: Vec<Command>) {
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&self, command: Command) {
        match command {
            Command::OpenSocket { attempt, url } => self.open_socket(attempt, &url),
            Command::CloseSocket => {
                if let Some(socket) = self.inner.borrow().socket.as_ref() {
                    let _ = socket.close();
                }
            }
            Command::Write(text) => {
                if let Some(socket) = self.inner.borrow().socket.as_ref() {
                    if let Err(e) = socket.send_with_str(&text) {
                        log::warn!("socket write failed: {e:?}");
                    }
                }
            }
            Command::ArmReconnect(delay) => {
                let weak = Rc::downgrade(&self.inner);
                let timeout = Timeout::new(millis(delay), move || {
                    if let Some(manager) = upgrade(&weak) {
                        manager.reconnect_due();
                    }
                });
                // Replacing a fired timeout is safe: this never runs inside
                // the reconnect callback itself.
                self.inner.borrow_mut().reconnect = Some(timeout);
            }
            Command::ArmKeepAlive(period) => {
                let weak = Rc::downgrade(&self.inner);
                let interval = Interval::new(millis(period), move || {
                    if let Some(manager) = upgrade(&weak) {
                        manager.keep_alive_due();
                    }
                });
                self.inner.borrow_mut().keep_alive = Some(interval);
            }
            Command::CancelKeepAlive => {
                self.inner.borrow_mut().keep_alive = None;
            }
            Command::Emit(event) => {
                let listener = self.inner.borrow().listener.clone();
                listener(event);
            }
        }
    }

    fn open_socket(&self, attempt: u64, url: &str) {
        self.detach_socket();

        let socket = match WebSocket::new(url) {
            Ok(socket) => socket,
            Err(e) => {
                log::error!("failed to create socket for {url}: {e:?}");
                // Report asynchronously: we may be inside the reconnect timer.
                let manager = self.clone();
                spawn_local(async move { manager.on_socket(attempt, SocketSignal::Closed) });
                return;
            }
        };

        let weak = Rc::downgrade(&self.inner);
        let on_open = Closure::<dyn FnMut()>::new({
            let weak = weak.clone();
            move || signal(&weak, attempt, SocketSignal::Opened)
        });
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new({
            let weak = weak.clone();
            move |ev: MessageEvent| match ev.data().as_string() {
                Some(text) => signal(&weak, attempt, SocketSignal::Frame(text)),
                None => log::warn!("ignoring non-text frame"),
            }
        });
        let on_error = Closure::<dyn FnMut()>::new({
            let weak = weak.clone();
            move || signal(&weak, attempt, SocketSignal::Errored)
        });
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            log::info!("socket closed (code {}, clean: {})", ev.code(), ev.was_clean());
            signal(&weak, attempt, SocketSignal::Closed)
        });

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let mut inner = self.inner.borrow_mut();
        inner.socket = Some(socket);
        inner.handlers = Some(SocketHandlers {
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        });
    }

    /// Unhooks and closes the previous socket before its callbacks are dropped.
    fn detach_socket(&self) {
        let (socket, handlers) = {
            let mut inner = self.inner.borrow_mut();
            (inner.socket.take(), inner.handlers.take())
        };
        if let Some(socket) = socket {
            socket.set_onopen(None);
            socket.set_onmessage(None);
            socket.set_onerror(None);
            socket.set_onclose(None);
            let _ = socket.close();
        }
        drop(handlers);
    }
}

fn upgrade(weak: &Weak<RefCell<Inner>>) -> Option<ConnectionManager> {
    weak.upgrade().map(|inner| ConnectionManager { inner })
}

fn signal(weak: &Weak<RefCell<Inner>>, attempt: u64, signal: SocketSignal) {
    if let Some(manager) = upgrade(weak) {
        manager.on_socket(attempt, signal);
    }
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
