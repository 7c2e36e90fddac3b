mod api;
mod components;
mod config;
mod state;
mod ws;

use leptos::prelude::*;
use leptos::mount::mount_to_body;

use components::chat::ChatArea;
use components::job_panel::JobPanel;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide(config::load());

    // Open the socket on mount; the welcome frame fills in the job panel.
    state.start();

    view! {
        <div class="app-container">
            <JobPanel />
            <ChatArea />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
