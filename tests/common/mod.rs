#![allow(dead_code)]

use std::sync::Once;

use buildersolve_chat::{update, ChatState, ConnectionState, Effect, JobSnapshot, Msg, TransportKind};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 4, 15, 7, 0).unwrap()
}

pub fn apply(state: &mut ChatState, msg: Msg) -> Vec<Effect> {
    update(state, msg, now())
}

pub fn frame(state: &mut ChatState, value: Value) -> Vec<Effect> {
    apply(state, Msg::Frame(value.to_string()))
}

pub fn open_state() -> ChatState {
    let mut state = ChatState::new(TransportKind::Streaming, 10);
    apply(&mut state, Msg::Connection(ConnectionState::Open));
    state
}

pub fn job_json(id: &str, title: &str) -> Value {
    json!({
        "documentId": id,
        "projectTitle": title,
        "clientName": "John & Jane Smith",
        "status": "In Planning",
        "siteStreet": "123 Maple Avenue",
        "siteCity": "Springfield",
        "estimateType": "general",
        "estimate": [
            {"area": "Kitchen", "description": "Remove existing cabinets", "total": 1500.00},
            {"area": "Kitchen", "description": "Install new hardwood", "total": 4500.00},
            {"area": "Site", "description": "General Site Cleanup Materials", "total": 655.50}
        ],
        "milestones": [
            {"title": "Initial Deposit", "amount": 2000.00, "state": true},
            {"title": "Demolition Complete", "amount": 1500.00, "state": false},
            {"title": "Rough-In Complete", "amount": 2500.00, "state": false},
            {"title": "Final Payment", "amount": 3000.00, "state": false}
        ],
        "clientEmail1": "john.smith@email.com",
        "clientPhone": "(555) 123-4567"
    })
}

pub fn job(id: &str, title: &str) -> JobSnapshot {
    serde_json::from_value(job_json(id, title)).unwrap()
}
