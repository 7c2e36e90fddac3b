use buildersolve_chat::render::{render_messages, render_typing_indicator, tool_toggle_label};
use buildersolve_chat::{ConnectionState, TransportKind};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use super::job_panel::JobContext;
use super::render_context;
use crate::state::AppState;

/// Main chat area: header, message thread, typing indicator and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let ctx = render_context();
    let container = NodeRef::<html::Div>::new();

    // The thread and the typing slot are separate regions so that a typing
    // toggle does not rebuild the thread and collapse open tool panels.
    let thread_html = Memo::new(move |_| {
        state
            .chat
            .with(|chat| render_messages(chat.messages(), &ctx))
            .unwrap_or_else(|e| {
                log::error!("Failed to render messages: {e}");
                String::new()
            })
    });
    let typing_html = Memo::new(move |_| {
        if !state.chat.with(|chat| chat.is_typing()) {
            return String::new();
        }
        render_typing_indicator().unwrap_or_else(|e| {
            log::error!("Failed to render typing indicator: {e}");
            String::new()
        })
    });

    // Keep the newest message in view.
    Effect::new(move |_| {
        thread_html.track();
        typing_html.track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <main class="chat-area">
            <div class="chat-header">
                <JobContext />
                <ConnectionStatus />
            </div>

            <div class="messages-container" node_ref=container on:click=toggle_tool_panel>
                <div class="thread" inner_html=move || thread_html.get()></div>
                <div class="typing-slot" inner_html=move || typing_html.get()></div>
            </div>

            <ChatInput />
        </main>
    }
}

/// Expands or collapses the tool panel behind a `data-tool-toggle` button.
fn toggle_tool_panel(ev: ev::MouseEvent) {
    let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    let Ok(Some(button)) = target.closest("[data-tool-toggle]") else {
        return;
    };
    let panel = button.get_attribute("data-tool-toggle").and_then(|id| {
        web_sys::window()?.document()?.get_element_by_id(&id)
    });
    let Some(panel) = panel else {
        log::warn!("Tool toggle without a matching panel");
        return;
    };

    let count = button
        .get_attribute("data-tool-count")
        .and_then(|count| count.parse().ok())
        .unwrap_or(0);
    let expand = panel.has_attribute("hidden");
    let toggled = if expand {
        panel.remove_attribute("hidden")
    } else {
        panel.set_attribute("hidden", "")
    };
    if let Err(e) = toggled {
        log::warn!("Failed to toggle tool panel: {e:?}");
        return;
    }

    let _ = button.set_attribute("aria-expanded", if expand { "true" } else { "false" });
    button.set_text_content(Some(&tool_toggle_label(expand, count)));
}

/// Connection indicator in the header.
#[component]
fn ConnectionStatus() -> impl IntoView {
    let state = expect_context::<AppState>();

    let online = move || state.chat.with(|chat| chat.can_send());
    let label = move || {
        state.chat.with(|chat| match chat.transport() {
            TransportKind::Rest => "HTTP",
            TransportKind::Streaming => chat.connection().label(),
        })
    };
    let reconnecting = move || {
        state.chat.with(|chat| {
            chat.transport() == TransportKind::Streaming
                && chat.connection() == ConnectionState::Closed
        })
    };

    view! {
        <div class="connection-status" class:online=online class:offline=reconnecting>
            <span class="status-dot"></span>
            {label}
        </div>
    }
}

/// Chat input form with textarea and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();

    let can_send = move || state.chat.with(|chat| chat.can_send());

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            state.submit();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    rows="1"
                    placeholder="Ask about this job… (Enter to send, Shift+Enter for newline)"
                    prop:value=move || state.draft.get()
                    on:input=move |ev| {
                        state.draft.set(event_target_value(&ev));
                    }
                    on:keydown=on_keydown
                    disabled=move || !can_send()
                />
                <button
                    class="send-btn"
                    on:click=move |_| state.submit()
                    disabled=move || !can_send() || state.draft.with(|d| d.trim().is_empty())
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}
