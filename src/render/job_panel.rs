use askama::Template;

use crate::errors::ChatError;
use crate::models::JobSnapshot;
use crate::render::format::format_currency;

/// Milestones shown before the "+ N remaining" footer.
pub const VISIBLE_MILESTONES: usize = 4;

#[derive(Template)]
#[template(path = "job_context.html")]
struct JobContextTemplate<'a> {
    loaded: bool,
    title: &'a str,
    address: String,
    short_id: &'a str,
}

struct MilestoneView<'a> {
    title: &'a str,
    amount: String,
    paid: bool,
}

#[derive(Template)]
#[template(path = "job_panel.html")]
struct JobPanelTemplate<'a> {
    loaded: bool,
    title: &'a str,
    short_id: &'a str,
    status: &'a str,
    status_class: &'a str,
    estimate_type: &'a str,
    estimate_total: String,
    line_items: usize,
    paid_to_date: String,
    completed: usize,
    milestone_count: usize,
    client_name: &'a str,
    initials: String,
    address: String,
    email: &'a str,
    phone: &'a str,
    milestones: Vec<MilestoneView<'a>>,
    remaining: usize,
}

impl Default for JobPanelTemplate<'_> {
    fn default() -> Self {
        Self {
            loaded: false,
            title: "",
            short_id: "",
            status: "",
            status_class: "",
            estimate_type: "",
            estimate_total: String::new(),
            line_items: 0,
            paid_to_date: String::new(),
            completed: 0,
            milestone_count: 0,
            client_name: "",
            initials: String::new(),
            address: String::new(),
            email: "",
            phone: "",
            milestones: Vec::new(),
            remaining: 0,
        }
    }
}

/// Compact header summary: title, address and id prefix.
pub fn render_job_context(job: Option<&JobSnapshot>) -> Result<String, ChatError> {
    let tmpl = match job {
        Some(job) => JobContextTemplate {
            loaded: true,
            title: job.title(),
            address: job.address(),
            short_id: job.short_id(),
        },
        None => JobContextTemplate { loaded: false, title: "", address: String::new(), short_id: "" },
    };
    Ok(tmpl.render()?)
}

/// Full job panel: totals, client block, status and milestones.
pub fn render_job_panel(job: Option<&JobSnapshot>) -> Result<String, ChatError> {
    let Some(job) = job else {
        return Ok(JobPanelTemplate::default().render()?);
    };

    let milestones = job
        .milestones
        .iter()
        .take(VISIBLE_MILESTONES)
        .map(|m| MilestoneView {
            title: m.title.as_deref().unwrap_or("Untitled milestone"),
            amount: format_currency(m.amount),
            paid: m.state,
        })
        .collect();

    let tmpl = JobPanelTemplate {
        loaded: true,
        title: job.title(),
        short_id: job.short_id(),
        status: job.status.as_deref().unwrap_or("Unknown"),
        status_class: if job.is_in_production() {
            "status-dot production"
        } else {
            "status-dot pending"
        },
        estimate_type: job.estimate_type.as_deref().unwrap_or_default(),
        estimate_total: format_currency(job.estimate_total()),
        line_items: job.estimate.len(),
        paid_to_date: format_currency(job.paid_to_date()),
        completed: job.completed_milestones(),
        milestone_count: job.milestones.len(),
        client_name: job.client_name.as_deref().unwrap_or("Unknown client"),
        initials: job.client_initials(),
        address: job.address(),
        email: job.client_email1.as_deref().unwrap_or_default(),
        phone: job.client_phone.as_deref().unwrap_or_default(),
        milestones,
        remaining: job.milestones.len().saturating_sub(VISIBLE_MILESTONES),
    };
    Ok(tmpl.render()?)
}
