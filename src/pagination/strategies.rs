//! Page cursor implementations
//!
//! Each cursor handles one pagination protocol.

use super::types::{
    parse_body, records_from_array, records_from_envelope, Page, PageCursor, PaginationState,
    Protocol,
};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{extract_token, JsonValue};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

// ============================================================================
// Range Pagination
// ============================================================================

/// Offset windows sent in a `Range` header (PostgREST style)
///
/// `GET /rest/v1/{collection}?order=id.asc` with `Range: 0-999`.
/// The response body is a bare JSON array.
#[derive(Debug, Clone)]
pub struct RangeCursor {
    /// Collection name
    pub collection: String,
    /// Request path, relative to the client's base URL
    pub path: String,
    /// Fixed query parameters (sort order, filters)
    pub query: Vec<(String, String)>,
    /// Window size
    pub page_size: u32,
}

impl RangeCursor {
    /// Create a new range cursor
    pub fn new(collection: impl Into<String>, path: impl Into<String>, page_size: u32) -> Self {
        Self {
            collection: collection.into(),
            path: path.into(),
            query: Vec::new(),
            page_size,
        }
    }

    /// Cursor over a PostgREST table, ordered by ascending id
    pub fn rest_table(rest_path: &str, table: &str, page_size: u32) -> Self {
        let path = format!("{}/{table}", rest_path.trim_end_matches('/'));
        Self::new(table, path, page_size).with_query("order", "id.asc")
    }

    /// Add a fixed query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[async_trait]
impl PageCursor for RangeCursor {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn protocol(&self) -> Protocol {
        Protocol::Range
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn advance(&self, client: &HttpClient, state: &PaginationState) -> Result<Page> {
        let range = state.range_header();
        let mut config = RequestConfig::new()
            .header("Accept", "application/json")
            .header("Range", &range);
        for (key, value) in &self.query {
            config = config.query(key, value);
        }

        debug!("GET {} Range: {}", self.path, range);
        let text = client.request_text(Method::GET, &self.path, config).await?;
        let body = parse_body(&self.collection, &text)?;
        let records = records_from_array(&self.collection, body)?;
        let next = state.after_range_page(records.len());

        Ok(Page { records, next })
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Opaque cursor forwarded as a query parameter
///
/// `GET /meetings?limit=500&cursor=...` answering
/// `{"meetings": [...], "pagination": {"next_cursor": "..."}}`.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    /// Collection name
    pub collection: String,
    /// Request path
    pub path: String,
    /// Key of the records array in the envelope
    pub records_key: String,
    /// Query parameter carrying the cursor
    pub cursor_param: String,
    /// Dotted path to the next cursor in the response
    pub cursor_path: String,
    /// Query parameter carrying the page size
    pub limit_param: String,
    /// Page size
    pub page_size: u32,
}

impl TokenCursor {
    /// Create a cursor with the conventional `cursor` / `limit` parameters
    pub fn new(
        collection: impl Into<String>,
        path: impl Into<String>,
        records_key: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            collection: collection.into(),
            path: path.into(),
            records_key: records_key.into(),
            cursor_param: "cursor".to_string(),
            cursor_path: "pagination.next_cursor".to_string(),
            limit_param: "limit".to_string(),
            page_size,
        }
    }
}

#[async_trait]
impl PageCursor for TokenCursor {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn protocol(&self) -> Protocol {
        Protocol::Cursor
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn advance(&self, client: &HttpClient, state: &PaginationState) -> Result<Page> {
        let mut config = RequestConfig::new()
            .header("Accept", "application/json")
            .query(&self.limit_param, state.page_size.to_string());
        if let Some(cursor) = state.token() {
            config = config.query(&self.cursor_param, cursor);
        }

        let text = client.request_text(Method::GET, &self.path, config).await?;
        let mut body = parse_body(&self.collection, &text)?;
        let records = records_from_envelope(&self.collection, &mut body, &self.records_key)?;
        let token = extract_token(&body, &self.cursor_path);
        let next = state.after_token_page(records.len(), token);

        Ok(Page { records, next })
    }
}

// ============================================================================
// After-Token Pagination
// ============================================================================

/// Search-style pagination: `POST` a body with `limit` and `after`
///
/// Answers `{"results": [...], "paging": {"next": {"after": "..."}}}`.
#[derive(Debug, Clone)]
pub struct AfterCursor {
    /// Collection name
    pub collection: String,
    /// Request path
    pub path: String,
    /// Base request body (filters, sorts, properties)
    pub body: JsonValue,
    /// Key of the records array in the envelope
    pub records_key: String,
    /// Dotted path to the next token in the response
    pub after_path: String,
    /// Page size
    pub page_size: u32,
}

impl AfterCursor {
    /// Create an after-token cursor over a search endpoint
    pub fn new(
        collection: impl Into<String>,
        path: impl Into<String>,
        body: JsonValue,
        page_size: u32,
    ) -> Self {
        Self {
            collection: collection.into(),
            path: path.into(),
            body,
            records_key: "results".to_string(),
            after_path: "paging.next.after".to_string(),
            page_size,
        }
    }

    /// Request body for the page at `state`
    pub fn request_body(&self, state: &PaginationState) -> JsonValue {
        let mut body = match &self.body {
            JsonValue::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        body.insert("limit".to_string(), state.page_size.into());
        if let Some(after) = state.token() {
            body.insert("after".to_string(), after.into());
        }
        JsonValue::Object(body)
    }
}

#[async_trait]
impl PageCursor for AfterCursor {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn protocol(&self) -> Protocol {
        Protocol::After
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn advance(&self, client: &HttpClient, state: &PaginationState) -> Result<Page> {
        let config = RequestConfig::new()
            .header("Accept", "application/json")
            .json(self.request_body(state));

        let text = client.request_text(Method::POST, &self.path, config).await?;
        let mut body = parse_body(&self.collection, &text)?;
        let records = records_from_envelope(&self.collection, &mut body, &self.records_key)?;
        let token = extract_token(&body, &self.after_path);
        let next = state.after_token_page(records.len(), token);

        Ok(Page { records, next })
    }
}
