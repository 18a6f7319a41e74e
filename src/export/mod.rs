//! Export module
//!
//! Drains remote collections and writes one snapshot per collection.
//!
//! Each collection is drained completely before its artifact is written,
//! so a failed drain never leaves a partial snapshot. Collections are
//! drained at different times and may reflect different remote states.

use crate::engine::Paginator;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::{PageCursor, RangeCursor};
use crate::snapshot::{SnapshotRef, SnapshotStore};
use std::collections::HashMap;
use tracing::{error, info};

/// Default PostgREST path prefix
pub const DEFAULT_REST_PATH: &str = "rest/v1";

/// Default records per `Range` window
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Configuration for table exports
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Path prefix of the REST tables
    pub rest_path: String,
    /// Records per page
    pub page_size: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            rest_path: DEFAULT_REST_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Writes remote collections to local snapshots
#[derive(Debug)]
pub struct Exporter<'a> {
    client: &'a HttpClient,
    store: &'a SnapshotStore,
    config: ExportConfig,
}

impl<'a> Exporter<'a> {
    /// Create an exporter with default config
    pub fn new(client: &'a HttpClient, store: &'a SnapshotStore) -> Self {
        Self {
            client,
            store,
            config: ExportConfig::default(),
        }
    }

    /// Set export configuration
    #[must_use]
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Export range-paginated REST tables in the given order, keyed by
    /// collection name.
    ///
    /// Stops at the first collection that fails; artifacts already
    /// written stay in place.
    pub async fn export_all<S: AsRef<str>>(
        &self,
        collections: &[S],
    ) -> Result<HashMap<String, SnapshotRef>> {
        let mut written = HashMap::with_capacity(collections.len());
        for name in collections {
            let name = name.as_ref();
            let cursor = RangeCursor::rest_table(&self.config.rest_path, name, self.config.page_size);
            written.insert(name.to_string(), self.export(&cursor).await?);
        }
        Ok(written)
    }

    /// Drain one collection and write its snapshot
    pub async fn export(&self, cursor: &dyn PageCursor) -> Result<SnapshotRef> {
        let collection = cursor.collection();
        let records = Paginator::new(self.client)
            .drain(cursor)
            .await
            .map_err(|e| {
                error!("Export of {collection} failed: {e}");
                e
            })?;

        let snapshot = self.store.write(collection, &records).await?;
        info!(
            "Wrote {} rows to {}",
            snapshot.records,
            snapshot.path.display()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests;
