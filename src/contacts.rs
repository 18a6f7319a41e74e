//! CRM contact lister
//!
//! Drains the CRM contact search for one owner using the `after` protocol.

use crate::engine::Paginator;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::AfterCursor;
use crate::types::Record;
use serde::Serialize;
use serde_json::json;

/// Contact search endpoint
pub const CONTACT_SEARCH_PATH: &str = "/crm/v3/objects/contacts/search";

/// Default search page size
pub const DEFAULT_CONTACTS_PAGE_SIZE: u32 = 100;

/// Placeholder name for contacts with neither first nor last name
pub const NO_NAME: &str = "(no name)";

/// A contact reduced to what the lister prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// CRM id
    pub id: String,
    /// `firstname lastname`, trimmed
    pub name: String,
    /// Email, empty when unknown
    pub email: String,
}

impl Contact {
    /// Build a contact from a search result
    pub fn from_record(record: &Record) -> Self {
        let id = match record.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let parts = [
            property(record, "firstname").trim(),
            property(record, "lastname").trim(),
        ];
        let name = parts
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id,
            name: if name.is_empty() {
                NO_NAME.to_string()
            } else {
                name
            },
            email: property(record, "email").to_string(),
        }
    }
}

fn property<'a>(record: &'a Record, name: &str) -> &'a str {
    record
        .get("properties")
        .and_then(|p| p.get(name))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} <{}>", self.id, self.name, self.email)
    }
}

/// Reads contacts through the CRM search API
#[derive(Debug)]
pub struct ContactsClient {
    client: HttpClient,
    page_size: u32,
}

impl ContactsClient {
    /// Create a client over an authenticated HTTP client rooted at the CRM API
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_CONTACTS_PAGE_SIZE,
        }
    }

    /// Set the search page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Search cursor for contacts owned by `owner_id`
    pub fn cursor(&self, owner_id: &str) -> AfterCursor {
        let body = json!({
            "filterGroups": [{
                "filters": [{
                    "propertyName": "hubspot_owner_id",
                    "operator": "EQ",
                    "value": owner_id
                }]
            }]
        });
        AfterCursor::new("contacts", CONTACT_SEARCH_PATH, body, self.page_size)
    }

    /// Every contact owned by `owner_id`, in search order
    pub async fn contacts_for_owner(&self, owner_id: &str) -> Result<Vec<Contact>> {
        let records = Paginator::new(&self.client)
            .drain(&self.cursor(owner_id))
            .await?;
        Ok(records.iter().map(Contact::from_record).collect())
    }
}
