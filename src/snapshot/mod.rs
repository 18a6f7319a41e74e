//! Snapshot module
//!
//! Durable local JSON artifacts, one per collection.
//!
//! # Overview
//!
//! The snapshot module provides:
//! - `SnapshotStore` - Reads and writes `{collection}.json` in a directory
//! - `SnapshotRef` - Where an export landed and how many records it holds
//!
//! Writes go to a temp file and are renamed into place, so an artifact is
//! either the previous one or the complete new one.

mod store;

pub use store::{SnapshotRef, SnapshotStore};
