mod common;

use buildersolve_chat::{
    ChatRequest, ChatState, ClientEnvelope, ConnectionState, Effect, HistoryEntry, Msg, Role,
    TransportKind,
};
use common::{apply, frame, init_logging, job_json, open_state};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sent_request(effects: &[Effect]) -> &ChatRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Send(ClientEnvelope::Message(request)) => Some(request),
            _ => None,
        })
        .expect("no message envelope was sent")
}

#[test]
fn submit_is_ignored_unless_open() {
    init_logging();
    for connection in [ConnectionState::Connecting, ConnectionState::Closed] {
        let mut state = ChatState::new(TransportKind::Streaming, 10);
        apply(&mut state, Msg::Connection(connection));
        let before = state.clone();

        let effects = apply(&mut state, Msg::Submit("What is the total estimate?".into()));

        assert!(effects.is_empty(), "{connection:?} produced effects");
        assert_eq!(state, before);
    }
}

#[test]
fn blank_input_is_rejected() {
    init_logging();
    let mut state = open_state();
    let before = state.clone();

    for input in ["", "   ", "\n\t  \n"] {
        assert!(apply(&mut state, Msg::Submit(input.into())).is_empty());
    }
    assert_eq!(state, before);
}

#[test]
fn submit_appends_optimistically_and_sends_envelope() {
    init_logging();
    let mut state = open_state();
    frame(&mut state, json!({"type": "welcome", "job": job_json("4ZppggAAJuJMZNB8f2ZT", "Smith"), "message": "Hello!"}));

    let effects = apply(&mut state, Msg::Submit("  What milestones are paid?  ".into()));

    assert_eq!(effects[0], Effect::ClearInput);
    let request = sent_request(&effects);
    assert_eq!(request.message, "What milestones are paid?");
    assert_eq!(request.current_job_id.as_deref(), Some("4ZppggAAJuJMZNB8f2ZT"));
    assert_eq!(
        request.history,
        vec![
            HistoryEntry { role: Role::Model, text: "Hello!".into() },
            HistoryEntry { role: Role::User, text: "What milestones are paid?".into() },
        ]
    );

    let last = state.messages().last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.content, "What milestones are paid?");
    assert!(state.is_typing());
}

#[test]
fn outbound_envelope_wire_shape() {
    init_logging();
    let mut state = open_state();
    let effects = apply(&mut state, Msg::Submit("hi".into()));

    let Some(Effect::Send(envelope)) = effects.last() else {
        panic!("expected a send effect, got {effects:?}");
    };
    let wire: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(
        wire,
        json!({
            "type": "message",
            "message": "hi",
            "history": [{"role": "user", "parts": [{"text": "hi"}]}],
            "currentJobId": null
        })
    );
    assert_eq!(ClientEnvelope::Ping.to_json().unwrap(), r#"{"type":"ping"}"#);
}

#[test]
fn history_window_drops_oldest_but_log_keeps_it() {
    init_logging();
    let mut state = open_state();

    let last_effects = (1..=11)
        .map(|n| apply(&mut state, Msg::Submit(format!("question {n}"))))
        .last()
        .unwrap();

    let history: Vec<&str> = sent_request(&last_effects)
        .history
        .iter()
        .map(|entry| entry.text.as_str())
        .collect();
    let expected: Vec<String> = (2..=11).map(|n| format!("question {n}")).collect();
    assert_eq!(history, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(state.messages().len(), 11);
    assert_eq!(state.messages()[0].content, "question 1");
}

#[test]
fn history_interleaves_roles_in_order() {
    init_logging();
    let mut state = open_state();

    apply(&mut state, Msg::Submit("one".into()));
    frame(&mut state, json!({"type": "response", "text": "reply one"}));
    let effects = apply(&mut state, Msg::Submit("two".into()));

    let roles: Vec<Role> = sent_request(&effects).history.iter().map(|e| e.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
}
