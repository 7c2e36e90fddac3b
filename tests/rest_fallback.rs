mod common;

use buildersolve_chat::{ChatReply, ChatState, Effect, Msg, Role, TransportKind, GENERIC_ERROR};
use common::{apply, init_logging, job};
use pretty_assertions::assert_eq;
use serde_json::json;

fn rest_state() -> ChatState {
    let mut state = ChatState::new(TransportKind::Rest, 10);
    apply(&mut state, Msg::JobFetched(job("job-a", "Smith Residence")));
    state
}

fn reply(value: serde_json::Value) -> ChatReply {
    serde_json::from_value(value).unwrap()
}

#[test]
fn rest_submit_posts_without_a_socket() {
    init_logging();
    let mut state = rest_state();

    let effects = apply(&mut state, Msg::Submit("How much is paid?".into()));

    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], Effect::ClearInput);
    let Effect::PostChat(request) = &effects[1] else {
        panic!("expected PostChat, got {:?}", effects[1]);
    };
    assert_eq!(request.message, "How much is paid?");
    assert_eq!(request.current_job_id.as_deref(), Some("job-a"));
    assert!(state.is_typing());

    let body = serde_json::to_value(request).unwrap();
    assert_eq!(body["currentJobId"], json!("job-a"));
    assert_eq!(body.get("type"), None);
}

#[test]
fn reply_appends_model_message() {
    init_logging();
    let mut state = rest_state();
    apply(&mut state, Msg::Submit("total?".into()));

    let effects = apply(
        &mut state,
        Msg::ChatReplied(reply(json!({
            "text": "The total is $6,655.50.",
            "toolExecutions": [{"toolName": "get_current_job_data", "args": {}, "result": {"ok": true}, "timestamp": 1714835220.0}]
        }))),
    );

    assert!(effects.is_empty());
    assert!(!state.is_typing());
    let last = state.messages().last().unwrap();
    assert_eq!(last.role, Role::Model);
    assert_eq!(last.content, "The total is $6,655.50.");
    assert_eq!(last.tool_executions.len(), 1);
}

#[test]
fn switched_job_is_fetched_only_when_different() {
    init_logging();
    let mut state = rest_state();

    let same = apply(
        &mut state,
        Msg::ChatReplied(reply(json!({"text": "still here", "switchedJobId": "job-a"}))),
    );
    assert!(same.is_empty());

    let switched = apply(
        &mut state,
        Msg::ChatReplied(reply(json!({"text": "switched", "switchedJobId": "job-h"}))),
    );
    assert_eq!(switched, vec![Effect::FetchJob { job_id: "job-h".into() }]);
    assert_eq!(state.current_job_id(), Some("job-a"));

    apply(&mut state, Msg::JobFetched(job("job-h", "Hammond Kitchen")));
    assert_eq!(state.current_job_id(), Some("job-h"));
    assert_eq!(state.current_job().unwrap().title(), "Hammond Kitchen");
}

#[test]
fn overlapping_job_fetches_last_write_wins() {
    init_logging();
    let mut state = rest_state();

    apply(&mut state, Msg::JobFetched(job("job-h", "Hammond")));
    apply(&mut state, Msg::JobFetched(job("job-b", "Baker")));

    assert_eq!(state.current_job_id(), Some("job-b"));
}

#[test]
fn failures_surface_one_generic_message() {
    init_logging();
    let mut state = rest_state();
    apply(&mut state, Msg::Submit("total?".into()));
    let before = state.messages().len();

    let effects = apply(&mut state, Msg::ChatFailed("Server error: 500".into()));

    assert!(effects.is_empty());
    assert!(!state.is_typing());
    assert_eq!(state.messages().len(), before + 1);
    assert_eq!(state.messages().last().unwrap().content, GENERIC_ERROR);

    apply(&mut state, Msg::JobFetchFailed("Network error: offline".into()));
    assert_eq!(state.messages().len(), before + 2);
    assert_eq!(state.current_job_id(), Some("job-a"));
}
