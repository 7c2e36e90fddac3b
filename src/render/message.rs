use askama::Template;

use crate::errors::ChatError;
use crate::models::{Message, Role, ToolExecution};
use crate::render::format::format_time_of_day;
use crate::render::RenderContext;

pub const TYPING_INDICATOR_ID: &str = "typing-indicator";

fn avatar(role: Role) -> &'static str {
    match role {
        Role::User => "🧑",
        Role::Model => "🤖",
        Role::System => "ℹ",
    }
}

/// Label of the tool-execution disclosure button.
pub fn tool_toggle_label(expanded: bool, count: usize) -> String {
    let verb = if expanded { "Hide" } else { "Show" };
    let noun = if count == 1 { "tool call" } else { "tool calls" };
    format!("{verb} {count} {noun}")
}

struct ToolView {
    name: String,
    time: String,
    args: String,
    result: String,
}

impl ToolView {
    fn new(tool: &ToolExecution, ctx: &RenderContext) -> Self {
        Self {
            name: tool.tool_name.clone(),
            time: tool
                .executed_at()
                .map(|at| format_time_of_day(at, ctx.utc_offset))
                .unwrap_or_default(),
            args: pretty_json(&tool.args),
            result: pretty_json(&tool.result),
        }
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[derive(Template)]
#[template(path = "message_bubble.html")]
struct MessageBubbleTemplate<'a> {
    id: &'a str,
    role: &'a str,
    avatar: &'a str,
    lines: Vec<&'a str>,
    time: String,
    tools: Vec<ToolView>,
    toggle_label: String,
}

#[derive(Template)]
#[template(path = "typing_indicator.html")]
struct TypingIndicatorTemplate<'a> {
    id: &'a str,
    avatar: &'a str,
}

/// One chat bubble. Each line of the content becomes its own paragraph;
/// blank lines are kept.
pub fn render_message(message: &Message, ctx: &RenderContext) -> Result<String, ChatError> {
    let tools: Vec<ToolView> = message
        .tool_executions
        .iter()
        .map(|tool| ToolView::new(tool, ctx))
        .collect();

    let tmpl = MessageBubbleTemplate {
        id: &message.id,
        role: message.role.as_str(),
        avatar: avatar(message.role),
        lines: message
            .content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect(),
        time: format_time_of_day(message.timestamp, ctx.utc_offset),
        toggle_label: tool_toggle_label(false, tools.len()),
        tools,
    };
    Ok(tmpl.render()?)
}

pub fn render_messages(messages: &[Message], ctx: &RenderContext) -> Result<String, ChatError> {
    messages
        .iter()
        .map(|message| render_message(message, ctx))
        .collect()
}

/// The singleton "model is typing" placeholder.
pub fn render_typing_indicator() -> Result<String, ChatError> {
    let tmpl = TypingIndicatorTemplate { id: TYPING_INDICATOR_ID, avatar: avatar(Role::Model) };
    Ok(tmpl.render()?)
}
