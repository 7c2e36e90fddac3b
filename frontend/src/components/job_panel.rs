use buildersolve_chat::render::{render_job_context, render_job_panel};
use leptos::prelude::*;

use crate::state::AppState;

/// Sidebar with the full snapshot of the job in focus.
#[component]
pub fn JobPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    let html = Memo::new(move |_| {
        state
            .chat
            .with(|chat| render_job_panel(chat.current_job()))
            .unwrap_or_else(|e| {
                log::error!("Failed to render job panel: {e}");
                String::new()
            })
    });

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <h2>"BuilderSolve"</h2>
            </div>
            <div class="job-panel" inner_html=move || html.get()></div>
        </aside>
    }
}

/// One-line job summary shown in the chat header.
#[component]
pub fn JobContext() -> impl IntoView {
    let state = expect_context::<AppState>();

    let html = Memo::new(move |_| {
        state
            .chat
            .with(|chat| render_job_context(chat.current_job()))
            .unwrap_or_else(|e| {
                log::error!("Failed to render job context: {e}");
                String::new()
            })
    });

    view! { <div class="job-context" inner_html=move || html.get()></div> }
}
