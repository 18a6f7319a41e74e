//! Snapshot store implementation
//!
//! Provides file-based snapshot persistence with atomic writes.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A written snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    /// Collection name
    pub collection: String,
    /// Artifact path
    pub path: PathBuf,
    /// Number of records written
    pub records: usize,
}

/// Directory of per-collection JSON snapshots
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Artifact path for a collection
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    /// Check whether a collection has a snapshot
    pub fn exists(&self, collection: &str) -> bool {
        self.path_for(collection).is_file()
    }

    /// Write a collection, replacing any existing artifact of the same name
    pub async fn write(&self, collection: &str, records: &[Record]) -> Result<SnapshotRef> {
        let path = self.path_for(collection);
        let contents = serde_json::to_string_pretty(records).map_err(|e| {
            Error::snapshot(format!("Failed to serialize {collection}: {e}"))
        })?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::snapshot(format!(
                "Failed to create snapshot directory {}: {e}",
                self.dir.display()
            ))
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::snapshot(format!("Failed to write {}: {e}", temp_path.display())))?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::snapshot(format!("Failed to rename {}: {e}", path.display())))?;

        debug!("Wrote {} records to {}", records.len(), path.display());

        Ok(SnapshotRef {
            collection: collection.to_string(),
            path,
            records: records.len(),
        })
    }

    /// Read a collection's snapshot.
    ///
    /// A missing artifact is `MissingSnapshot`. A single JSON object is read
    /// as a one-record collection.
    pub async fn read(&self, collection: &str) -> Result<Vec<Record>> {
        let path = self.path_for(collection);
        if !path.exists() {
            return Err(Error::missing_snapshot(
                collection,
                path.display().to_string(),
            ));
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::snapshot(format!("Failed to read {}: {e}", path.display())))?;

        let value: JsonValue = serde_json::from_str(&contents)
            .map_err(|e| Error::snapshot(format!("Failed to parse {}: {e}", path.display())))?;

        match value {
            JsonValue::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    JsonValue::Object(record) => Ok(record),
                    _ => Err(Error::snapshot(format!(
                        "{}: item {i} is not an object",
                        path.display()
                    ))),
                })
                .collect(),
            JsonValue::Object(record) => Ok(vec![record]),
            _ => Err(Error::snapshot(format!(
                "{}: expected a JSON array of records",
                path.display()
            ))),
        }
    }
}
