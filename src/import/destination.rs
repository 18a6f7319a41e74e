//! Import destinations

use crate::error::{Error, Result};
use crate::export::DEFAULT_REST_PATH;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::records_from_array;
use crate::types::{JsonValue, Record};
use async_trait::async_trait;
use reqwest::Method;

/// Somewhere records can be inserted
#[async_trait]
pub trait Destination: Send + Sync {
    /// Insert `records` into `collection`.
    ///
    /// With `returning`, the inserted rows (including generated ids) are
    /// returned in request order; otherwise the result may be empty.
    /// A write that was accepted but whose response cannot be read fails
    /// with `Error::UnreadableResponse`.
    async fn insert(
        &self,
        collection: &str,
        records: &[Record],
        returning: bool,
    ) -> Result<Vec<Record>>;
}

/// PostgREST table writer: `POST /rest/v1/{collection}` with a JSON array
#[derive(Debug)]
pub struct RestDestination {
    client: HttpClient,
    rest_path: String,
}

impl RestDestination {
    /// Create a destination over an authenticated client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            rest_path: DEFAULT_REST_PATH.to_string(),
        }
    }

    /// Override the REST path prefix
    #[must_use]
    pub fn with_rest_path(mut self, rest_path: impl Into<String>) -> Self {
        self.rest_path = rest_path.into();
        self
    }

    fn table_path(&self, collection: &str) -> String {
        format!("{}/{collection}", self.rest_path.trim_end_matches('/'))
    }
}

#[async_trait]
impl Destination for RestDestination {
    async fn insert(
        &self,
        collection: &str,
        records: &[Record],
        returning: bool,
    ) -> Result<Vec<Record>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut config = RequestConfig::new()
            .header("Accept", "application/json")
            .json(serde_json::to_value(records)?);
        if returning {
            config = config.header("Prefer", "return=representation");
        }

        let text = self
            .client
            .request_text(Method::POST, &self.table_path(collection), config)
            .await?;

        if !returning || text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: JsonValue = serde_json::from_str(&text).map_err(|e| {
            Error::unreadable_response(collection, format!("invalid JSON: {e}"))
        })?;
        records_from_array(collection, value).map_err(|e| match e {
            Error::MalformedPage { message, .. } => Error::unreadable_response(collection, message),
            other => other,
        })
    }
}
