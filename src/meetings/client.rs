//! Meetings API reader

use super::types::MeetingDetails;
use crate::engine::Paginator;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::TokenCursor;
use crate::types::Record;
use reqwest::Method;
use tracing::debug;

/// Default page size for the meetings listing (the API maximum)
pub const DEFAULT_MEETINGS_PAGE_SIZE: u32 = 500;

/// Reads a team's meetings and their details
#[derive(Debug)]
pub struct MeetingsClient {
    client: HttpClient,
    team_id: String,
    page_size: u32,
}

impl MeetingsClient {
    /// Create a client over an authenticated HTTP client whose base URL is
    /// the API root (e.g. `https://api.meetgeek.ai/v1`)
    pub fn new(client: HttpClient, team_id: impl Into<String>) -> Self {
        Self {
            client,
            team_id: team_id.into(),
            page_size: DEFAULT_MEETINGS_PAGE_SIZE,
        }
    }

    /// Set the listing page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Cursor over the team's meeting list
    pub fn cursor(&self) -> TokenCursor {
        TokenCursor::new(
            "meetings",
            format!("/teams/{}/meetings", self.team_id),
            "meetings",
            self.page_size,
        )
    }

    /// Drain every meeting of the team
    pub async fn list_meetings(&self) -> Result<Vec<Record>> {
        Paginator::new(&self.client).drain(&self.cursor()).await
    }

    /// Fetch one meeting's details
    pub async fn get_meeting(&self, meeting_id: &str) -> Result<MeetingDetails> {
        debug!("Fetching meeting {meeting_id}");
        let config = RequestConfig::new().header("Accept", "application/json");
        let mut details: MeetingDetails = self
            .client
            .request_json(Method::GET, &format!("/meetings/{meeting_id}"), config)
            .await?;
        if details.meeting_id.is_empty() {
            details.meeting_id = meeting_id.to_string();
        }
        Ok(details)
    }
}
