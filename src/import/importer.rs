//! Import execution

use super::destination::Destination;
use super::types::{CollectionReport, CollectionSpec, ImportConfig, ImportReport, KeyStrategy};
use crate::error::{Error, Result};
use crate::remap::KeyRemapper;
use crate::snapshot::SnapshotStore;
use crate::types::{Record, RecordId, ID_FIELD};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Check that every dependency points at an earlier identity-remap step
pub fn validate_plan(specs: &[CollectionSpec]) -> Result<()> {
    for (i, spec) in specs.iter().enumerate() {
        if specs[..i].iter().any(|s| s.name == spec.name) {
            return Err(Error::config(format!(
                "Collection '{}' appears twice in the import plan",
                spec.name
            )));
        }

        let Some(dep) = &spec.depends_on else {
            continue;
        };
        match specs[..i].iter().find(|s| s.name == dep.parent) {
            Some(parent) if parent.strategy == KeyStrategy::IdentityRemap => {}
            Some(_) => {
                return Err(Error::config(format!(
                    "'{}' depends on '{}', which is not an identity-remap collection",
                    spec.name, dep.parent
                )))
            }
            None => {
                return Err(Error::config(format!(
                    "'{}' depends on '{}', which must be imported before it",
                    spec.name, dep.parent
                )))
            }
        }
    }
    Ok(())
}

/// Runs an import plan against a destination
pub struct Importer<'a> {
    destination: &'a dyn Destination,
    store: &'a SnapshotStore,
    config: ImportConfig,
}

impl<'a> Importer<'a> {
    /// Create an importer with default config
    pub fn new(destination: &'a dyn Destination, store: &'a SnapshotStore) -> Self {
        Self {
            destination,
            store,
            config: ImportConfig::default(),
        }
    }

    /// Set import configuration
    #[must_use]
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Import every collection in plan order.
    ///
    /// An invalid plan or a missing snapshot aborts the run. Record and
    /// batch failures are collected in the report. Earlier collections are
    /// never rolled back.
    pub async fn import_all(&self, specs: &[CollectionSpec]) -> Result<ImportReport> {
        validate_plan(specs)?;

        let mut remappers: HashMap<String, KeyRemapper> = HashMap::new();
        let mut report = ImportReport::default();

        for spec in specs {
            let records = self.store.read(&spec.name).await?;
            info!(
                "Importing {} {} records ({:?})",
                records.len(),
                spec.name,
                spec.strategy
            );

            let parent = spec
                .depends_on
                .as_ref()
                .and_then(|dep| remappers.get(&dep.parent));
            let (collection_report, remapper) =
                self.import_collection(spec, records, parent).await?;

            info!(
                "Inserted {} {} ({} skipped, {} failed)",
                collection_report.inserted,
                spec.name,
                collection_report.skipped,
                collection_report.failed
            );
            report.collections.push(collection_report);

            if let Some(remapper) = remapper {
                remappers.insert(spec.name.clone(), remapper);
            }
        }

        Ok(report)
    }

    async fn import_collection(
        &self,
        spec: &CollectionSpec,
        records: Vec<Record>,
        parent: Option<&KeyRemapper>,
    ) -> Result<(CollectionReport, Option<KeyRemapper>)> {
        let mut report = CollectionReport::new(&spec.name, records.len());
        let prepared = self.rewrite_foreign_keys(spec, records, parent, &mut report);

        match spec.strategy {
            KeyStrategy::IdentityRemap => {
                let remapper = self.insert_one_by_one(spec, prepared, &mut report).await?;
                Ok((report, Some(remapper)))
            }
            KeyStrategy::PassThrough | KeyStrategy::Regenerate => {
                self.insert_batched(spec, prepared, &mut report).await?;
                Ok((report, None))
            }
        }
    }

    /// Rewrite the dependency field of every record; unresolved records are
    /// skipped and reported.
    fn rewrite_foreign_keys(
        &self,
        spec: &CollectionSpec,
        records: Vec<Record>,
        parent: Option<&KeyRemapper>,
        report: &mut CollectionReport,
    ) -> Vec<(usize, Record)> {
        let (Some(dep), Some(parent)) = (&spec.depends_on, parent) else {
            return records.into_iter().enumerate().collect();
        };

        let mut kept = Vec::with_capacity(records.len());
        for (index, mut record) in records.into_iter().enumerate() {
            let rewritten = match record.get_mut(&dep.field) {
                Some(value) => parent.rewrite(value).map(|_| ()),
                None => Ok(()),
            };

            match rewritten {
                Ok(()) => kept.push((index, record)),
                Err(e) => {
                    let id = RecordId::of(&record);
                    warn!(
                        "Skipping {} record #{index} ({}): {e}",
                        spec.name,
                        id.as_ref().map_or_else(|| "no id".to_string(), ToString::to_string)
                    );
                    report.skipped += 1;
                    report.push_failure(index, id, e.to_string());
                }
            }
        }
        kept
    }

    async fn insert_one_by_one(
        &self,
        spec: &CollectionSpec,
        records: Vec<(usize, Record)>,
        report: &mut CollectionReport,
    ) -> Result<KeyRemapper> {
        let mut remapper = KeyRemapper::new(&spec.name);

        for (index, mut record) in records {
            let original = RecordId::of(&record);
            let Some(old_id) = original.as_ref().and_then(RecordId::as_int) else {
                let e = Error::invalid_record(&spec.name, "identity-remap record has no integer id");
                warn!("Skipping {} record #{index}: {e}", spec.name);
                report.skipped += 1;
                report.push_failure(index, original, e.to_string());
                continue;
            };
            record.remove(ID_FIELD);

            let inserted = match self
                .destination
                .insert(&spec.name, std::slice::from_ref(&record), true)
                .await
            {
                Ok(rows) => rows,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) if e.is_accepted_write() => {
                    error!("{} id {old_id} inserted but not mapped: {e}", spec.name);
                    report.inserted += 1;
                    report.unmapped += 1;
                    report.push_failure(index, original, e.to_string());
                    continue;
                }
                Err(e) => {
                    error!("Insert of {} id {old_id} failed: {e}", spec.name);
                    report.failed += 1;
                    report.push_failure(index, original, e.to_string());
                    continue;
                }
            };
            report.inserted += 1;

            let new_id = inserted
                .first()
                .and_then(RecordId::of)
                .and_then(|id| id.as_int());
            let registered = match new_id {
                Some(new_id) => remapper.register(old_id, new_id).map(|()| new_id),
                None => Err(Error::invalid_record(
                    &spec.name,
                    "destination returned no integer id for the inserted row",
                )),
            };

            match registered {
                Ok(new_id) => debug!("{} id {old_id} -> {new_id}", spec.name),
                Err(e) => {
                    error!("{} id {old_id} inserted but not mapped: {e}", spec.name);
                    report.unmapped += 1;
                    report.push_failure(index, original, e.to_string());
                }
            }
        }

        Ok(remapper)
    }

    async fn insert_batched(
        &self,
        spec: &CollectionSpec,
        records: Vec<(usize, Record)>,
        report: &mut CollectionReport,
    ) -> Result<()> {
        let strip = spec.strategy.strips_id();

        for (batch_no, chunk) in records.chunks(self.config.batch_size).enumerate() {
            let batch: Vec<Record> = chunk
                .iter()
                .map(|(_, record)| {
                    let mut record = record.clone();
                    if strip {
                        record.remove(ID_FIELD);
                    }
                    record
                })
                .collect();

            match self.destination.insert(&spec.name, &batch, false).await {
                Ok(_) => {
                    report.inserted += batch.len();
                    debug!(
                        "{} batch {batch_no}: inserted {} records",
                        spec.name,
                        batch.len()
                    );
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) if e.is_accepted_write() => {
                    warn!("{} batch {batch_no} inserted, response ignored: {e}", spec.name);
                    report.inserted += batch.len();
                }
                Err(e) => {
                    let first = chunk.first().map_or(0, |(i, _)| *i);
                    let last = chunk.last().map_or(0, |(i, _)| *i);
                    error!(
                        "{} batch {batch_no} (records #{first}..=#{last}) failed: {e}",
                        spec.name
                    );
                    report.failed += batch.len();
                    report.push_failure(
                        first,
                        None,
                        format!(
                            "batch {batch_no} of {} records (#{first}..=#{last}) rejected: {e}",
                            batch.len()
                        ),
                    );
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Importer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Importer")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
