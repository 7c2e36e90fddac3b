use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Status string that marks a job as being in its production phase.
pub const PRODUCTION_STATUS: &str = "Production";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::System => "system",
        }
    }
}

/// One backend tool call, shown for transparency only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolExecution {
    #[serde(default)]
    pub id: Option<String>,
    pub tool_name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub result: Value,
    /// Fractional Unix seconds, as the agent records them.
    #[serde(default)]
    pub timestamp: f64,
}

impl ToolExecution {
    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() || self.timestamp <= 0.0 {
            return None;
        }
        let secs = self.timestamp.trunc() as i64;
        let nanos = (self.timestamp.fract() * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// An entry of the conversation log. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tool_executions: Vec<ToolExecution>,
}

/// `{role, text}` pair replayed to the agent with each outbound message.
///
/// Encoded as `{"role": .., "parts": [{"text": ..}]}`, the chat-history
/// layout the agent reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

impl From<&Message> for HistoryEntry {
    fn from(m: &Message) -> Self {
        Self { role: m.role, text: m.content.clone() }
    }
}

impl Serialize for HistoryEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        let mut entry = serializer.serialize_struct("HistoryEntry", 2)?;
        entry.serialize_field("role", self.role.as_str())?;
        entry.serialize_field("parts", &[Part { text: &self.text }])?;
        entry.end()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    /// `true` once the milestone has been paid.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLine {
    /// Price to the client. The job store calls this field `total`.
    #[serde(default, alias = "total", deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub task_scope: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost_code: Option<String>,
}

/// The job currently in focus. Always replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub site_street: Option<String>,
    #[serde(default)]
    pub site_city: Option<String>,
    #[serde(default)]
    pub site_state: Option<String>,
    #[serde(default)]
    pub site_zip: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email1: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimate_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimate: Vec<EstimateLine>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub milestones: Vec<Milestone>,
}

impl JobSnapshot {
    pub fn title(&self) -> &str {
        self.project_title.as_deref().unwrap_or("Untitled job")
    }

    /// First eight characters of the document id.
    pub fn short_id(&self) -> &str {
        match self.document_id.char_indices().nth(8) {
            Some((idx, _)) => &self.document_id[..idx],
            None => &self.document_id,
        }
    }

    /// `street, city` plus state and zip when the job has them.
    pub fn address(&self) -> String {
        let region = [self.site_state.as_deref(), self.site_zip.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [self.site_street.as_deref(), self.site_city.as_deref(), Some(region.as_str())]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn estimate_total(&self) -> f64 {
        self.estimate.iter().map(|line| line.amount).sum()
    }

    pub fn paid_to_date(&self) -> f64 {
        self.milestones.iter().filter(|m| m.state).map(|m| m.amount).sum()
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.state).count()
    }

    /// Uppercased first two characters of the client name.
    pub fn client_initials(&self) -> String {
        let initials: String = self
            .client_name
            .as_deref()
            .unwrap_or_default()
            .trim()
            .chars()
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }

    pub fn is_in_production(&self) -> bool {
        self.status.as_deref() == Some(PRODUCTION_STATUS)
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_lines_accept_the_store_total_field() {
        let job: JobSnapshot = serde_json::from_value(serde_json::json!({
            "documentId": "4ZppggAAJuJMZNB8f2ZT",
            "estimate": [{"total": 1500.0}, {"amount": 4500.0}, {"total": null}],
            "milestones": null,
            "clientEmail1": null
        }))
        .unwrap();

        assert_eq!(job.estimate_total(), 6000.0);
        assert!(job.milestones.is_empty());
        assert_eq!(job.short_id(), "4ZppggAA");
    }

    #[test]
    fn address_skips_missing_parts() {
        let job = JobSnapshot {
            site_street: Some("123 Maple Avenue".into()),
            site_city: Some("Springfield".into()),
            site_state: Some("IL".into()),
            ..Default::default()
        };
        assert_eq!(job.address(), "123 Maple Avenue, Springfield, IL");

        let bare = JobSnapshot { site_city: Some("Springfield".into()), ..Default::default() };
        assert_eq!(bare.address(), "Springfield");
    }

    #[test]
    fn history_entry_uses_parts_layout() {
        let entry = HistoryEntry { role: Role::Model, text: "hi".into() };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"role": "model", "parts": [{"text": "hi"}]})
        );
    }
}
