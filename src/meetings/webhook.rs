//! Paced webhook notifications

use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default minimum gap between two notifications
pub const DEFAULT_WEBHOOK_INTERVAL: Duration = Duration::from_secs(8);

/// Calls `GET {webhook}?id={meeting_id}`, at most once per interval
#[derive(Debug)]
pub struct WebhookNotifier {
    client: HttpClient,
    url: Url,
    interval: Duration,
}

impl WebhookNotifier {
    /// Create a notifier for `webhook_url`
    pub fn new(webhook_url: &str, interval: Duration) -> Result<Self> {
        let url = Url::parse(webhook_url)?;
        let config = HttpClientConfig::builder()
            .rate_limit(RateLimiterConfig::fixed_interval(interval))
            .build();

        Ok(Self {
            client: HttpClient::with_config(config)?,
            url,
            interval,
        })
    }

    /// Minimum gap between notifications
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// URL that notifies about `meeting_id`
    pub fn url_for(&self, meeting_id: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("id", meeting_id);
        url
    }

    /// Notify about one meeting, returning the response status
    pub async fn notify(&self, meeting_id: &str) -> Result<u16> {
        let url = self.url_for(meeting_id);
        debug!("Webhook GET {url}");
        let response = self.client.get(url.as_str()).await?;
        Ok(response.status().as_u16())
    }
}
