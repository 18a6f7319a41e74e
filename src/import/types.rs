//! Import plan and report types

use crate::types::RecordId;
use serde::{Deserialize, Serialize};

/// Records per request for batched strategies
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// How a collection's primary key is treated on import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyStrategy {
    /// Destination assigns ids; insert one by one and record old → new
    IdentityRemap,
    /// Ids are stable (UUIDs); keep them and insert in batches
    #[default]
    PassThrough,
    /// Destination assigns ids but nothing depends on them; strip and batch
    Regenerate,
}

impl KeyStrategy {
    /// Whether the original `id` is removed before insertion
    pub fn strips_id(self) -> bool {
        matches!(self, Self::IdentityRemap | Self::Regenerate)
    }
}

/// Foreign key from a dependent collection into an identity-keyed parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Parent collection name
    pub parent: String,
    /// Foreign-key field in the dependent collection
    pub field: String,
}

/// One step of an import plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Collection name (also the snapshot name)
    pub name: String,
    /// Key strategy
    #[serde(default)]
    pub strategy: KeyStrategy,
    /// Optional parent dependency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
}

impl CollectionSpec {
    /// Create a spec
    pub fn new(name: impl Into<String>, strategy: KeyStrategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            depends_on: None,
        }
    }

    /// Identity-keyed collection whose new ids are tracked
    pub fn identity_remap(name: impl Into<String>) -> Self {
        Self::new(name, KeyStrategy::IdentityRemap)
    }

    /// Collection with stable ids
    pub fn pass_through(name: impl Into<String>) -> Self {
        Self::new(name, KeyStrategy::PassThrough)
    }

    /// Identity-keyed leaf collection
    pub fn regenerate(name: impl Into<String>) -> Self {
        Self::new(name, KeyStrategy::Regenerate)
    }

    /// Declare a foreign key into `parent`
    #[must_use]
    pub fn depends_on(mut self, parent: impl Into<String>, field: impl Into<String>) -> Self {
        self.depends_on = Some(Dependency {
            parent: parent.into(),
            field: field.into(),
        });
        self
    }
}

/// Configuration for an import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Records per request for batched strategies
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ImportConfig {
    /// Set batch size (at least 1)
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

/// Why a record was not (fully) imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Position in the snapshot
    pub index: usize,
    /// Snapshot id, when the record had one
    pub record: Option<RecordId>,
    /// Underlying cause
    pub message: String,
}

impl std::fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.record {
            Some(id) => write!(f, "record #{} (id {id}): {}", self.index, self.message),
            None => write!(f, "record #{}: {}", self.index, self.message),
        }
    }
}

/// Outcome for one collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    /// Collection name
    pub collection: String,
    /// Records read from the snapshot
    pub total: usize,
    /// Records the destination accepted
    pub inserted: usize,
    /// Records skipped before insertion (unresolved references, no id)
    pub skipped: usize,
    /// Records whose insert request failed
    pub failed: usize,
    /// Inserted records whose new id could not be registered
    pub unmapped: usize,
    /// One entry per skipped, failed or unmapped record or batch
    pub failures: Vec<RecordFailure>,
}

impl CollectionReport {
    /// Create an empty report
    pub fn new(collection: impl Into<String>, total: usize) -> Self {
        Self {
            collection: collection.into(),
            total,
            ..Default::default()
        }
    }

    /// Check if every record went in cleanly
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn push_failure(
        &mut self,
        index: usize,
        record: Option<RecordId>,
        message: impl Into<String>,
    ) {
        self.failures.push(RecordFailure {
            index,
            record,
            message: message.into(),
        });
    }
}

/// Outcome of an import run, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Per-collection outcomes
    pub collections: Vec<CollectionReport>,
}

impl ImportReport {
    /// Report for one collection
    pub fn get(&self, collection: &str) -> Option<&CollectionReport> {
        self.collections.iter().find(|c| c.collection == collection)
    }

    /// Inserted records across all collections
    pub fn total_inserted(&self) -> usize {
        self.collections.iter().map(|c| c.inserted).sum()
    }

    /// Check if every collection went in cleanly
    pub fn is_clean(&self) -> bool {
        self.collections.iter().all(CollectionReport::is_clean)
    }
}
