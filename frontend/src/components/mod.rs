pub mod chat;
pub mod job_panel;

use buildersolve_chat::RenderContext;

/// Render settings for this browser: timestamps follow the local UTC offset.
pub(crate) fn render_context() -> RenderContext {
    // getTimezoneOffset is minutes *behind* UTC.
    let behind = js_sys::Date::new_0().get_timezone_offset();
    RenderContext::with_offset_minutes(-(behind as i32))
}
