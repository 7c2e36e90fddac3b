//! Render components: pure functions from state snapshots to markup.
//!
//! Every interpolated value passes through askama's HTML escaper, so
//! server-supplied text can never inject markup.

mod format;
mod job_panel;
mod message;

use chrono::{FixedOffset, Offset, Utc};

pub use format::{format_currency, format_time_of_day};
pub use job_panel::{render_job_context, render_job_panel, VISIBLE_MILESTONES};
pub use message::{
    render_message, render_messages, render_typing_indicator, tool_toggle_label,
    TYPING_INDICATOR_ID,
};

/// Viewer-specific inputs that are not part of the application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub utc_offset: FixedOffset,
}

impl RenderContext {
    /// `minutes_east` of UTC; out-of-range values fall back to UTC.
    pub fn with_offset_minutes(minutes_east: i32) -> Self {
        let utc_offset = minutes_east
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { utc_offset }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self { utc_offset: Utc.fix() }
    }
}
