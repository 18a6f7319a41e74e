//! Key remapping
//!
//! Tracks old → new ids for one identity-keyed collection so that
//! dependents can rewrite their foreign keys after the parent was
//! re-inserted with destination-assigned ids.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::collections::HashMap;

/// Outcome of rewriting one foreign-key value
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Value replaced by the remapped id
    Remapped { old_id: i64, new_id: i64 },
    /// Null reference, left as is
    Null,
}

/// Old id → new id map scoped to a single parent collection
#[derive(Debug, Clone, Default)]
pub struct KeyRemapper {
    collection: String,
    map: HashMap<i64, i64>,
}

impl KeyRemapper {
    /// Create an empty remapper for `collection`
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            map: HashMap::new(),
        }
    }

    /// Collection this map belongs to
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Record that `old_id` became `new_id`.
    ///
    /// Registering the same pair twice is a no-op; a different `new_id`
    /// for an already registered `old_id` is a `DuplicateKey` error.
    pub fn register(&mut self, old_id: i64, new_id: i64) -> Result<()> {
        match self.map.get(&old_id) {
            Some(&existing) if existing != new_id => Err(Error::DuplicateKey {
                collection: self.collection.clone(),
                old_id,
                existing,
                attempted: new_id,
            }),
            Some(_) => Ok(()),
            None => {
                self.map.insert(old_id, new_id);
                Ok(())
            }
        }
    }

    /// New id for `old_id`, or `UnresolvedReference`
    pub fn resolve(&self, old_id: i64) -> Result<i64> {
        self.map
            .get(&old_id)
            .copied()
            .ok_or_else(|| Error::unresolved(&self.collection, old_id))
    }

    /// Rewrite a foreign-key value in place.
    ///
    /// Nulls pass through. Anything that is not an integer cannot refer to
    /// an identity key and is unresolved.
    pub fn rewrite(&self, value: &mut JsonValue) -> Result<Rewrite> {
        let old_id = match value {
            JsonValue::Null => return Ok(Rewrite::Null),
            JsonValue::Number(n) => n
                .as_i64()
                .ok_or_else(|| Error::unresolved(&self.collection, n.to_string()))?,
            other => return Err(Error::unresolved(&self.collection, other.to_string())),
        };

        let new_id = self.resolve(old_id)?;
        *value = JsonValue::from(new_id);
        Ok(Rewrite::Remapped { old_id, new_id })
    }

    /// Number of registered ids
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if nothing was registered
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
