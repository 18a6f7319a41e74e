//! Drain engine module
//!
//! Drives a page cursor to exhaustion.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Paginator` - Repeats `PageCursor::advance` from the initial state
//!   until the cursor reports exhaustion, concatenating pages in order
//! - `Drain` / `DrainStats` - The drained records and what it took
//!
//! A failed page fails the whole drain; no partial collection is returned.
//! Drains are re-runnable from scratch.

mod types;

pub use types::{Drain, DrainStats};

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{NextPage, PageCursor, Position};
use crate::types::Record;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

/// Drives page cursors against one HTTP client
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    client: &'a HttpClient,
}

impl<'a> Paginator<'a> {
    /// Create a paginator over the given client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Drain every page of the cursor's collection into memory
    pub async fn drain(&self, cursor: &dyn PageCursor) -> Result<Vec<Record>> {
        Ok(self.drain_with_stats(cursor).await?.records)
    }

    /// Drain and report page/record counts
    pub async fn drain_with_stats(&self, cursor: &dyn PageCursor) -> Result<Drain> {
        let start = Instant::now();
        let collection = cursor.collection();
        let mut state = cursor.initial_state();
        let mut consumed: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        let mut stats = DrainStats::new();

        debug!(
            "Starting drain of {collection} ({:?}, page size {})",
            state.protocol, state.page_size
        );

        loop {
            let page = cursor.advance(self.client, &state).await?;

            stats.add_page();
            stats.add_records(page.records.len());
            debug!(
                "{collection}: page {} returned {} records",
                stats.pages,
                page.records.len()
            );
            records.extend(page.records);

            match page.next {
                NextPage::Exhausted => break,
                NextPage::Continue(next) => {
                    if let Position::Token(token) = &next.position {
                        if !consumed.insert(token.clone()) {
                            return Err(Error::malformed_page(
                                collection,
                                format!("server repeated continuation token '{token}'"),
                            ));
                        }
                    }
                    state = next;
                }
            }
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Drained {collection}: {} records in {} pages",
            stats.records, stats.pages
        );

        Ok(Drain { records, stats })
    }
}
