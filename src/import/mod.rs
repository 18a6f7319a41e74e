//! Import module
//!
//! Re-inserts snapshots into the destination in dependency order.
//!
//! # Overview
//!
//! The import module provides:
//! - `Importer` - Runs an ordered plan of `CollectionSpec`s
//! - `Destination` - Where records are inserted (`RestDestination` for
//!   PostgREST)
//! - `ImportReport` - Per-collection inserted/skipped/failed counts with
//!   a diagnostic for every record that did not make it
//!
//! Identity-keyed parents are inserted one record at a time so each
//! destination-assigned id can be paired with the snapshot id; dependents
//! have their foreign keys rewritten through the parent's `KeyRemapper`.
//! Nothing is rolled back.

mod destination;
mod importer;
mod types;

pub use destination::{Destination, RestDestination};
pub use importer::{validate_plan, Importer};
pub use types::{
    CollectionReport, CollectionSpec, Dependency, ImportConfig, ImportReport, KeyStrategy,
    RecordFailure, DEFAULT_BATCH_SIZE,
};
