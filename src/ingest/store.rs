use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::filter::{Selection, dates_for_location, distinct_locations, distinct_sections};
use crate::ingest::pipeline::{IngestError, ingest};
use crate::ingest::row::RawRow;
use crate::record::AuditRecord;

/// Identifies one load started with [`RecordStore::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Result of committing a successfully ingested batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The collection was replaced with this many records.
    Applied { records: usize },
    /// A newer load was started meanwhile; the batch was discarded.
    Superseded,
}

/// In-memory audit record collection, replaced whole on every load.
///
/// Readers get an immutable [`Arc`] snapshot and never observe a partially
/// replaced collection. When loads overlap, the last one started wins.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<Arc<Vec<AuditRecord>>>,
    generation: AtomicU64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current collection.
    pub fn snapshot(&self) -> Arc<Vec<AuditRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Starts a load; any load started earlier can no longer commit.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Ingests `rows` and swaps them in if `ticket` is still the newest load.
    ///
    /// # Errors
    ///
    /// Propagates [`IngestError`]; the existing collection is left untouched.
    #[tracing::instrument(skip(self, rows), fields(ticket = ticket.0, rows = rows.len()))]
    pub fn commit(&self, ticket: LoadTicket, rows: &[RawRow]) -> Result<CommitOutcome, IngestError> {
        if !self.is_current(ticket) {
            warn!("Load superseded before ingestion");
            return Ok(CommitOutcome::Superseded);
        }

        let records = ingest(rows)?;
        let count = records.len();

        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        // Checked again under the lock so a newer commit cannot be overwritten.
        if !self.is_current(ticket) {
            warn!("Load superseded during ingestion");
            return Ok(CommitOutcome::Superseded);
        }
        *guard = Arc::new(records);
        drop(guard);

        info!(records = count, "Record collection replaced");
        Ok(CommitOutcome::Applied { records: count })
    }

    /// Starts and commits a load in one step.
    pub fn load(&self, rows: &[RawRow]) -> Result<CommitOutcome, IngestError> {
        let ticket = self.begin_load();
        self.commit(ticket, rows)
    }

    pub fn locations(&self) -> Vec<String> {
        distinct_locations(&self.snapshot())
    }

    pub fn sections(&self) -> Vec<String> {
        distinct_sections(&self.snapshot())
    }

    pub fn dates_for_location(&self, location: &Selection) -> Vec<NaiveDate> {
        dates_for_location(&self.snapshot(), location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(store: &str, answers: &[&str]) -> Vec<RawRow> {
        answers
            .iter()
            .map(|a| {
                RawRow::new()
                    .with("Store", store)
                    .with("Answer", *a)
                    .with("Date", "2024-01-10")
            })
            .collect()
    }

    #[test]
    fn test_load_replaces_collection() {
        let store = RecordStore::new();
        assert!(store.is_empty());

        let outcome = store.load(&rows("Store A", &["Good", "Poor"])).unwrap();
        assert_eq!(outcome, CommitOutcome::Applied { records: 2 });
        assert_eq!(store.locations(), ["Store A"]);

        store.load(&rows("Store B", &["Fair"])).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.locations(), ["Store B"]);
    }

    #[test]
    fn test_failed_load_keeps_previous_records() {
        let store = RecordStore::new();
        store.load(&rows("Store A", &["Good"])).unwrap();

        assert_eq!(store.load(&[]), Err(IngestError::EmptyBatch));
        assert_eq!(
            store.load(&rows("Store B", &["N/A"])),
            Err(IngestError::NoMappableRows { rows: 1 })
        );
        assert_eq!(store.locations(), ["Store A"]);
    }

    #[test]
    fn test_older_load_is_superseded() {
        let store = RecordStore::new();
        let first = store.begin_load();
        let second = store.begin_load();

        let outcome = store.commit(second, &rows("Store B", &["Good"])).unwrap();
        assert_eq!(outcome, CommitOutcome::Applied { records: 1 });

        let late = store.commit(first, &rows("Store A", &["Good", "Fair"])).unwrap();
        assert_eq!(late, CommitOutcome::Superseded);
        assert_eq!(store.locations(), ["Store B"]);
    }

    #[test]
    fn test_snapshot_is_stable_across_replacement() {
        let store = RecordStore::new();
        store.load(&rows("Store A", &["Good"])).unwrap();
        let before = store.snapshot();

        store.load(&rows("Store B", &["Good", "Good"])).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].location, "Store A");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_dates_for_location() {
        let store = RecordStore::new();
        store.load(&rows("Store A", &["Good"])).unwrap();
        let dates = store.dates_for_location(&Selection::from("Store A"));
        assert_eq!(dates, [NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()]);
        assert_eq!(store.sections(), ["General"]);
    }
}
