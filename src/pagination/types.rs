//! Pagination types and traits
//!
//! Defines the page-cursor abstraction shared by all three protocols.

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{JsonValue, Record};
use async_trait::async_trait;

/// Pagination protocol of a remote collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `Range: start-end` header over a zero-based offset
    Range,
    /// Opaque `next_cursor` forwarded as a query parameter
    Cursor,
    /// Opaque `after` token forwarded in a search body
    After,
}

/// Where the next request starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// First request of a token protocol
    Start,
    /// Zero-based record offset
    Offset(u64),
    /// Token handed out by the server, forwarded byte-for-byte
    Token(String),
}

/// Tracks where a drain currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Protocol the position belongs to
    pub protocol: Protocol,
    /// Current position
    pub position: Position,
    /// Records requested per page
    pub page_size: u32,
}

impl PaginationState {
    /// Initial state: offset 0 for ranges, no token otherwise
    pub fn initial(protocol: Protocol, page_size: u32) -> Self {
        let position = match protocol {
            Protocol::Range => Position::Offset(0),
            Protocol::Cursor | Protocol::After => Position::Start,
        };
        Self {
            protocol,
            position,
            page_size: page_size.max(1),
        }
    }

    /// Current offset (0 for token protocols)
    pub fn offset(&self) -> u64 {
        match self.position {
            Position::Offset(offset) => offset,
            _ => 0,
        }
    }

    /// Current token, if one has been handed out
    pub fn token(&self) -> Option<&str> {
        match &self.position {
            Position::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Inclusive `Range` header value for the current window
    pub fn range_header(&self) -> String {
        let start = self.offset();
        let end = start + u64::from(self.page_size) - 1;
        format!("{start}-{end}")
    }

    /// Next state after a range page with `returned` records.
    ///
    /// A short page (including empty) is terminal. Otherwise the offset
    /// advances by exactly `page_size`.
    pub fn after_range_page(&self, returned: usize) -> NextPage {
        if returned < self.page_size as usize {
            return NextPage::Exhausted;
        }
        NextPage::Continue(Self {
            protocol: self.protocol,
            position: Position::Offset(self.offset() + u64::from(self.page_size)),
            page_size: self.page_size,
        })
    }

    /// Next state after a cursor/after page.
    ///
    /// Exhausted when the page is empty or no token came back.
    pub fn after_token_page(&self, returned: usize, token: Option<String>) -> NextPage {
        match token {
            Some(token) if returned > 0 && !token.is_empty() => NextPage::Continue(Self {
                protocol: self.protocol,
                position: Position::Token(token),
                page_size: self.page_size,
            }),
            _ => NextPage::Exhausted,
        }
    }
}

/// Result of advancing a cursor by one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available from this state
    Continue(PaginationState),
    /// No more pages
    Exhausted,
}

impl NextPage {
    /// Check if this is the terminal result
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// One page of a collection plus where to go next
#[derive(Debug, Clone)]
pub struct Page {
    /// Records in server order
    pub records: Vec<Record>,
    /// Continuation
    pub next: NextPage,
}

/// Fetches one page of a remote collection.
///
/// Implementations must treat non-2xx responses as failures, never as
/// exhaustion.
#[async_trait]
pub trait PageCursor: Send + Sync {
    /// Name of the collection this cursor reads
    fn collection(&self) -> &str;

    /// Protocol tag
    fn protocol(&self) -> Protocol;

    /// Records requested per page
    fn page_size(&self) -> u32;

    /// Starting state for a fresh drain
    fn initial_state(&self) -> PaginationState {
        PaginationState::initial(self.protocol(), self.page_size())
    }

    /// Fetch the page at `state`
    async fn advance(&self, client: &HttpClient, state: &PaginationState) -> Result<Page>;
}

/// Parse a response body, mapping invalid JSON to a malformed page
pub fn parse_body(collection: &str, text: &str) -> Result<JsonValue> {
    serde_json::from_str(text)
        .map_err(|e| Error::malformed_page(collection, format!("invalid JSON: {e}")))
}

/// Turn a JSON array into records; anything else is a malformed page
pub fn records_from_array(collection: &str, value: JsonValue) -> Result<Vec<Record>> {
    let JsonValue::Array(items) = value else {
        return Err(Error::malformed_page(
            collection,
            format!("expected a JSON array, got {}", kind_of(&value)),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(record) => Ok(record),
            other => Err(Error::malformed_page(
                collection,
                format!("item {i} is {}, not an object", kind_of(&other)),
            )),
        })
        .collect()
}

/// Take the records array stored under `key` out of an envelope object
pub fn records_from_envelope(
    collection: &str,
    body: &mut JsonValue,
    key: &str,
) -> Result<Vec<Record>> {
    let value = body
        .as_object_mut()
        .and_then(|map| map.remove(key))
        .ok_or_else(|| {
            Error::malformed_page(collection, format!("response has no '{key}' array"))
        })?;

    if value.is_null() {
        return Ok(Vec::new());
    }
    records_from_array(collection, value)
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
