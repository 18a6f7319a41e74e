//! Meeting transcripts module
//!
//! Lists a team's meetings through the cursor protocol, fetches each
//! meeting's details and forwards its id to a webhook.
//!
//! # Overview
//!
//! - `MeetingsClient` - `GET /teams/{team}/meetings` and `GET /meetings/{id}`
//! - `WebhookNotifier` - `GET {webhook}?id=...`, paced by a fixed interval
//! - `notify_meetings` - Processes meetings one after another; a failing
//!   meeting is logged and the rest still run

mod client;
mod types;
mod webhook;

pub use client::{MeetingsClient, DEFAULT_MEETINGS_PAGE_SIZE};
pub use types::{filter_by_date, meeting_date, parse_date_filter, MeetingDetails, MeetingOutcome};
pub use webhook::{WebhookNotifier, DEFAULT_WEBHOOK_INTERVAL};

use crate::error::Result;
use crate::types::Record;
use tracing::{info, warn};

/// Fetch details for each meeting and notify the webhook, sequentially
pub async fn notify_meetings(
    client: &MeetingsClient,
    notifier: &WebhookNotifier,
    meetings: &[Record],
) -> Vec<MeetingOutcome> {
    let mut outcomes = Vec::with_capacity(meetings.len());

    for meeting in meetings {
        let meeting_id = meeting
            .get("meeting_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let outcome = match notify_one(client, notifier, &meeting_id).await {
            Ok((status, summary)) => {
                info!("webhook ok {status}, {summary}");
                MeetingOutcome::Notified {
                    meeting_id,
                    status,
                    summary,
                }
            }
            Err(e) => {
                warn!("Meeting {meeting_id} failed: {e}");
                MeetingOutcome::Failed {
                    meeting_id,
                    message: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

async fn notify_one(
    client: &MeetingsClient,
    notifier: &WebhookNotifier,
    meeting_id: &str,
) -> Result<(u16, String)> {
    let details = client.get_meeting(meeting_id).await?;
    let status = notifier.notify(meeting_id).await?;
    Ok((status, details.summary()))
}

#[cfg(test)]
mod tests;
