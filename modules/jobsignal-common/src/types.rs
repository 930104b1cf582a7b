use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// --- Transcript types ---

/// One parsed chat message. Timestamps are naive: the transcript carries no
/// timezone, so none is attached or implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl ChatMessage {
    /// Identity key for message-level dedup: sender, timestamp (second
    /// precision, ISO-8601) and trimmed body.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.sender,
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.text.trim()
        )
    }
}

/// One rendered message bubble as delivered by a transcript source:
/// the metadata header line and the visible body text, both unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBubble {
    pub header_text: String,
    pub body_text: String,
}

/// Outcome of one scroll-up step against the history pane.
/// `found == false` means no scrollable history container was located.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollProbe {
    pub found: bool,
    pub at_top: bool,
    pub before: f64,
    pub after: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

// --- Classification types ---

/// The reply schema for message classification. Every field defaults, so a
/// reply that omits keys still deserializes to a complete record; unknown
/// keys are ignored. `skills` accepts either a JSON string or a list and is
/// normalized to a single comma-joined string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobClassification {
    #[serde(default)]
    pub relevant: bool,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub skills: String,
    #[serde(default)]
    pub contact_email: String,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => scalar_to_string(&other),
    })
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// --- Job records ---

/// Spreadsheet column order for persisted job rows.
pub const SHEET_HEADER: [&str; 7] = [
    "Date",
    "Company",
    "Role",
    "Location",
    "Experience",
    "Skills",
    "Contact Email",
];

/// Minute-precision display format for the record date column.
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A relevant job lead ready for persistence. `sender` is carried for the
/// notification e-mail only and is not part of the spreadsheet row or the
/// dedup identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub date: String,
    pub sender: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub experience: String,
    pub skills: String,
    pub contact_email: String,
}

impl JobRecord {
    pub fn from_message(message: &ChatMessage, classification: &JobClassification) -> Self {
        Self {
            date: message.timestamp.format(RECORD_DATE_FORMAT).to_string(),
            sender: message.sender.clone(),
            company: classification.company.clone(),
            role: classification.role.clone(),
            location: classification.location.clone(),
            experience: classification.experience.clone(),
            skills: classification.skills.clone(),
            contact_email: classification.contact_email.clone(),
        }
    }

    /// Case-insensitive identity over the seven persisted cells. The whole
    /// joined string is trimmed and lowercased, matching how keys are
    /// rebuilt from previously persisted rows.
    pub fn dedup_key(&self) -> String {
        [
            self.date.as_str(),
            self.company.as_str(),
            self.role.as_str(),
            self.location.as_str(),
            self.experience.as_str(),
            self.skills.as_str(),
            self.contact_email.as_str(),
        ]
        .join("|")
        .trim()
        .to_lowercase()
    }

    /// The seven cells in `SHEET_HEADER` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.company.clone(),
            self.role.clone(),
            self.location.clone(),
            self.experience.clone(),
            self.skills.clone(),
            self.contact_email.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn message(sender: &str, text: &str) -> ChatMessage {
        ChatMessage {
            sender: sender.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            text: text.to_string(),
        }
    }

    // --- message key tests ---

    #[test]
    fn message_dedup_key_uses_iso_timestamp_and_trimmed_text() {
        let key = message("Alice", "  hello  ").dedup_key();
        assert_eq!(key, "Alice|2026-01-02T09:00:00|hello");
    }

    #[test]
    fn messages_differing_only_in_padding_share_a_key() {
        assert_eq!(
            message("Alice", "hello").dedup_key(),
            message("Alice", "\nhello ").dedup_key()
        );
    }

    // --- classification schema tests ---

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let parsed: JobClassification = serde_json::from_value(json!({ "relevant": true })).unwrap();
        assert!(parsed.relevant);
        assert_eq!(parsed.company, "");
        assert_eq!(parsed.skills, "");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let parsed: JobClassification =
            serde_json::from_value(json!({ "relevant": false, "confidence": 0.9 })).unwrap();
        assert_eq!(parsed, JobClassification::default());
    }

    #[test]
    fn skills_list_is_joined_with_commas() {
        let parsed: JobClassification = serde_json::from_value(
            json!({ "skills": ["Playwright", "  ", "API testing", 7] }),
        )
        .unwrap();
        assert_eq!(parsed.skills, "Playwright, API testing, 7");
    }

    #[test]
    fn skills_string_is_trimmed() {
        let parsed: JobClassification =
            serde_json::from_value(json!({ "skills": "  Selenium, Python  " })).unwrap();
        assert_eq!(parsed.skills, "Selenium, Python");
    }

    #[test]
    fn skills_null_becomes_empty() {
        let parsed: JobClassification = serde_json::from_value(json!({ "skills": null })).unwrap();
        assert_eq!(parsed.skills, "");
    }

    #[test]
    fn non_boolean_relevant_is_a_parse_error() {
        let result: Result<JobClassification, _> =
            serde_json::from_value(json!({ "relevant": "yes" }));
        assert!(result.is_err());
    }

    // --- record tests ---

    #[test]
    fn record_date_is_minute_precision() {
        let record = JobRecord::from_message(&message("Alice", "hi"), &JobClassification::default());
        assert_eq!(record.date, "2026-01-02 09:00");
    }

    #[test]
    fn record_dedup_key_is_case_insensitive() {
        let classification = JobClassification {
            relevant: true,
            company: "Acme".to_string(),
            role: "QA Engineer".to_string(),
            ..JobClassification::default()
        };
        let a = JobRecord::from_message(&message("Alice", "hi"), &classification);
        let mut b = a.clone();
        b.company = "ACME".to_string();
        b.role = "qa engineer".to_string();
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn record_dedup_key_ignores_sender() {
        let classification = JobClassification::default();
        let a = JobRecord::from_message(&message("Alice", "hi"), &classification);
        let b = JobRecord::from_message(&message("Bob", "hi"), &classification);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn row_matches_header_width_and_order() {
        let record = JobRecord {
            date: "2026-01-02 09:00".to_string(),
            sender: "Alice".to_string(),
            company: "Acme".to_string(),
            role: "QA".to_string(),
            location: "Remote".to_string(),
            experience: "3y".to_string(),
            skills: "Playwright".to_string(),
            contact_email: "jobs@acme.test".to_string(),
        };
        let row = record.to_row();
        assert_eq!(row.len(), SHEET_HEADER.len());
        assert_eq!(row[0], "2026-01-02 09:00");
        assert_eq!(row[6], "jobs@acme.test");
        assert!(!row.contains(&"Alice".to_string()));
    }
}
