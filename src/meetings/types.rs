//! Meeting types and date helpers

use crate::error::{Error, Result};
use crate::types::Record;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted shape of a date filter
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Meeting details as returned by `GET /meetings/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingDetails {
    /// Meeting id
    pub meeting_id: String,
    /// Title
    pub title: String,
    /// Recording source (zoom, google_meet, ...)
    pub source: String,
    /// Start time, UTC
    pub timestamp_start_utc: String,
    /// Join link, when the API has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_link: Option<String>,
    /// Participant emails
    pub participant_emails: Vec<String>,
}

impl MeetingDetails {
    /// One-line summary: `title, id, source, start, emails`
    pub fn summary(&self) -> String {
        [
            self.title.as_str(),
            self.meeting_id.as_str(),
            self.source.as_str(),
            self.timestamp_start_utc.as_str(),
            &self.participant_emails.join(" and "),
        ]
        .join(", ")
    }
}

/// Parse a `yyyy-mm-dd` filter
pub fn parse_date_filter(input: &str) -> Result<NaiveDate> {
    if !DATE_REGEX.is_match(input) {
        return Err(Error::config(format!(
            "date must be in format yyyy-mm-dd, got '{input}'"
        )));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| Error::config(format!("invalid date '{input}': {e}")))
}

/// `yyyy-mm-dd` prefix of a meeting's `timestamp_start_utc`
pub fn meeting_date(meeting: &Record) -> Option<&str> {
    meeting
        .get("timestamp_start_utc")
        .and_then(|v| v.as_str())
        .and_then(|ts| ts.get(..10))
}

/// Keep the meetings that start on `date` (UTC)
pub fn filter_by_date(meetings: Vec<Record>, date: NaiveDate) -> Vec<Record> {
    let wanted = date.format("%Y-%m-%d").to_string();
    meetings
        .into_iter()
        .filter(|m| meeting_date(m) == Some(wanted.as_str()))
        .collect()
}

/// Outcome of processing one meeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingOutcome {
    /// Details fetched and webhook accepted
    Notified {
        /// Meeting id
        meeting_id: String,
        /// Webhook response status
        status: u16,
        /// Summary line
        summary: String,
    },
    /// Details or webhook failed
    Failed {
        /// Meeting id
        meeting_id: String,
        /// Failure diagnostic
        message: String,
    },
}

impl MeetingOutcome {
    /// Check if the webhook accepted the meeting
    pub fn is_notified(&self) -> bool {
        matches!(self, Self::Notified { .. })
    }
}

impl std::fmt::Display for MeetingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notified {
                status, summary, ..
            } => write!(f, "webhook ok {status}, {summary}"),
            Self::Failed {
                meeting_id,
                message,
            } => write!(f, "{meeting_id} error: {message}"),
        }
    }
}
