//! The record store.
//!
//! Single point of truth for reading, writing, merging, and ordering the
//! three record collections (medications, health statistics, medical
//! history). View code holds only derived copies obtained through this API
//! and never touches the underlying collections directly.
//!
//! Two contract points worth knowing:
//!
//! - [`RecordStore::load_medications`] persists its merged result back to
//!   the primary collection. Every load is also a compaction step that
//!   folds chat-derived entries in; callers that must not trigger a write
//!   use [`RecordStore::medications_snapshot`].
//! - Corrupt stored data is never an error. A collection that fails to
//!   parse is logged and treated as empty; only storage *writes* fail
//!   loudly, since a failed write leaves nothing safe to report as saved.

mod merge;

pub use merge::*;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{Database, DbError};
use crate::models::{
    DerivedMedication, HealthStatInput, HealthStatRecord, MedicalHistoryInput,
    MedicalHistoryRecord, MedicationInput, MedicationRecord,
};

/// Key of the secondary (chat-derived) medication collection.
pub const SECONDARY_MEDICATIONS_KEY: &str = "medications";

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    #[error("no record with id {id}")]
    NotFound { id: String },

    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A record type persisted as a JSON-encoded array under a fixed
/// collection key.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone {
    /// Storage key of the collection.
    const COLLECTION_KEY: &'static str;
    /// Field named in validation errors when the primary value is blank.
    const PRIMARY_FIELD: &'static str;

    fn id(&self) -> &str;
    fn date(&self) -> DateTime<Utc>;
    /// The required free-text field checked on create and update.
    fn primary_value(&self) -> &str;
}

impl StoredRecord for MedicationRecord {
    const COLLECTION_KEY: &'static str = "healthRecords";
    const PRIMARY_FIELD: &'static str = "name";

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn primary_value(&self) -> &str {
        &self.name
    }
}

impl StoredRecord for HealthStatRecord {
    const COLLECTION_KEY: &'static str = "healthStats";
    const PRIMARY_FIELD: &'static str = "value";

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn primary_value(&self) -> &str {
        &self.value
    }
}

impl StoredRecord for MedicalHistoryRecord {
    const COLLECTION_KEY: &'static str = "medicalHistory";
    const PRIMARY_FIELD: &'static str = "provider";

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn primary_value(&self) -> &str {
        &self.provider
    }
}

/// Newest first; stable, so records created in the same millisecond keep
/// their insertion order.
fn sort_newest_first<T: StoredRecord>(items: &mut [T]) {
    items.sort_by(|a, b| b.date().cmp(&a.date()));
}

/// The consolidated record store.
pub struct RecordStore {
    db: Database,
}

impl RecordStore {
    /// Open a store backed by the database at `path`, creating it if
    /// needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }

    // =========================================================================
    // Generic collection plumbing
    // =========================================================================

    /// Read and decode a collection. Absent or unparseable data degrades
    /// to the empty collection; reads never fail.
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.db.read_value(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(items) => items,
                Err(e) => {
                    warn!(key, error = %e, "unparseable collection, treating as empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "collection read failed, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items).map_err(DbError::from)?;
        self.db.write_value(key, &json)?;
        Ok(())
    }

    fn validate<T: StoredRecord>(record: &T) -> StoreResult<()> {
        if record.primary_value().trim().is_empty() {
            return Err(StoreError::Validation {
                field: T::PRIMARY_FIELD,
            });
        }
        Ok(())
    }

    fn load_sorted<T: StoredRecord>(&self) -> Vec<T> {
        let mut items: Vec<T> = self.read_collection(T::COLLECTION_KEY);
        sort_newest_first(&mut items);
        items
    }

    /// Validate and prepend a new record, then persist the full list.
    fn insert<T: StoredRecord>(&self, record: T) -> StoreResult<T> {
        Self::validate(&record)?;
        let mut items: Vec<T> = self.read_collection(T::COLLECTION_KEY);
        items.insert(0, record.clone());
        sort_newest_first(&mut items);
        self.write_collection(T::COLLECTION_KEY, &items)?;
        Ok(record)
    }

    /// Replace the record matching `id` wholesale. The replacement must
    /// carry the complete desired shape, not a sparse diff.
    fn replace<T: StoredRecord>(&self, id: &str, record: T) -> StoreResult<T> {
        Self::validate(&record)?;
        let mut items: Vec<T> = self.read_collection(T::COLLECTION_KEY);
        let Some(slot) = items.iter_mut().find(|r| r.id() == id) else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };
        *slot = record.clone();
        sort_newest_first(&mut items);
        self.write_collection(T::COLLECTION_KEY, &items)?;
        Ok(record)
    }

    /// Remove the record matching `id`. A miss is a silent no-op, not an
    /// error; the removed record is returned so the caller can name it.
    fn remove<T: StoredRecord>(&self, id: &str) -> StoreResult<Option<T>> {
        let mut items: Vec<T> = self.read_collection(T::COLLECTION_KEY);
        let removed = items
            .iter()
            .position(|r| r.id() == id)
            .map(|index| items.remove(index));
        self.write_collection(T::COLLECTION_KEY, &items)?;
        Ok(removed)
    }

    // =========================================================================
    // Medications
    // =========================================================================

    fn merged_medications(&self) -> (Vec<MedicationRecord>, usize) {
        let primary = self.read_collection(MedicationRecord::COLLECTION_KEY);
        let secondary: Vec<DerivedMedication> =
            self.read_collection(SECONDARY_MEDICATIONS_KEY);
        let (mut combined, added) = merge_secondary(primary, &secondary);
        sort_newest_first(&mut combined);
        (combined, added)
    }

    /// Load the merged medication list.
    ///
    /// Folds chat-derived entries without a primary counterpart into the
    /// primary collection, sorts newest first, and persists the merged
    /// result back, so every load is also a compaction step. Idempotent
    /// while the secondary collection does not change.
    pub fn load_medications(&self) -> StoreResult<Vec<MedicationRecord>> {
        let (combined, added) = self.merged_medications();
        self.write_collection(MedicationRecord::COLLECTION_KEY, &combined)?;
        if added > 0 {
            debug!(added, "compacted derived medications into primary collection");
        }
        Ok(combined)
    }

    /// The merged medication view without the compaction write, for
    /// callers that must not trigger persistence.
    pub fn medications_snapshot(&self) -> Vec<MedicationRecord> {
        self.merged_medications().0
    }

    pub fn add_medication(&self, input: MedicationInput) -> StoreResult<MedicationRecord> {
        self.insert(MedicationRecord::new(input))
    }

    pub fn update_medication(
        &self,
        id: &str,
        record: MedicationRecord,
    ) -> StoreResult<MedicationRecord> {
        self.replace(id, record)
    }

    pub fn delete_medication(&self, id: &str) -> StoreResult<Option<MedicationRecord>> {
        self.remove(id)
    }

    /// Append raw chat-derived entries to the secondary collection. They
    /// surface in the primary collection on the next load.
    pub fn record_derived_medications(
        &self,
        batch: &[DerivedMedication],
    ) -> StoreResult<()> {
        let mut raw: Vec<DerivedMedication> =
            self.read_collection(SECONDARY_MEDICATIONS_KEY);
        raw.extend(
            batch
                .iter()
                .filter(|m| !m.name.trim().is_empty())
                .cloned(),
        );
        self.write_collection(SECONDARY_MEDICATIONS_KEY, &raw)
    }

    // =========================================================================
    // Health statistics
    // =========================================================================

    pub fn list_health_stats(&self) -> Vec<HealthStatRecord> {
        self.load_sorted()
    }

    pub fn add_health_stat(&self, input: HealthStatInput) -> StoreResult<HealthStatRecord> {
        self.insert(HealthStatRecord::new(input))
    }

    pub fn update_health_stat(
        &self,
        id: &str,
        record: HealthStatRecord,
    ) -> StoreResult<HealthStatRecord> {
        self.replace(id, record)
    }

    pub fn delete_health_stat(&self, id: &str) -> StoreResult<Option<HealthStatRecord>> {
        self.remove(id)
    }

    // =========================================================================
    // Medical history
    // =========================================================================

    pub fn list_medical_history(&self) -> Vec<MedicalHistoryRecord> {
        self.load_sorted()
    }

    pub fn add_medical_history(
        &self,
        input: MedicalHistoryInput,
    ) -> StoreResult<MedicalHistoryRecord> {
        self.insert(MedicalHistoryRecord::new(input))
    }

    pub fn update_medical_history(
        &self,
        id: &str,
        record: MedicalHistoryRecord,
    ) -> StoreResult<MedicalHistoryRecord> {
        self.replace(id, record)
    }

    pub fn delete_medical_history(
        &self,
        id: &str,
    ) -> StoreResult<Option<MedicalHistoryRecord>> {
        self.remove(id)
    }

    /// Raw stored bytes for a collection key (diagnostics and tests).
    pub fn raw_collection(&self, key: &str) -> Option<String> {
        self.db.read_value(key).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryKind, StatKind};

    fn setup_store() -> RecordStore {
        RecordStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_add_rejects_blank_primary_field() {
        let store = setup_store();

        let err = store
            .add_medical_history(MedicalHistoryInput {
                kind: HistoryKind::DoctorVisit,
                provider: "   ".into(),
                location: Some("City Clinic".into()),
                notes: None,
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation { field: "provider" }));
        // No partial write: the collection is untouched.
        assert!(store.list_medical_history().is_empty());
        assert_eq!(store.raw_collection("medicalHistory"), None);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = setup_store();
        let record = store
            .add_health_stat(HealthStatInput {
                kind: StatKind::Weight,
                value: "70".into(),
                notes: None,
            })
            .unwrap();

        let mut edited = record;
        edited.value = "71".into();
        let err = store.update_health_stat("missing-id", edited).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_update_rejects_blank_primary_field() {
        let store = setup_store();
        let record = store
            .add_health_stat(HealthStatInput {
                kind: StatKind::Weight,
                value: "70".into(),
                notes: None,
            })
            .unwrap();

        let mut edited = record.clone();
        edited.value = "".into();
        let err = store.update_health_stat(&record.id, edited).unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "value" }));

        // Stored value unchanged.
        let stats = store.list_health_stats();
        assert_eq!(stats[0].value, "70");
    }

    #[test]
    fn test_delete_miss_is_silent_and_keeps_records() {
        let store = setup_store();
        for value in ["1", "2", "3"] {
            store
                .add_health_stat(HealthStatInput {
                    kind: StatKind::Steps,
                    value: value.into(),
                    notes: None,
                })
                .unwrap();
        }

        let removed = store.delete_health_stat("not-there").unwrap();
        assert!(removed.is_none());
        assert_eq!(store.list_health_stats().len(), 3);
    }

    #[test]
    fn test_delete_returns_removed_record() {
        let store = setup_store();
        let record = store
            .add_medication(MedicationInput {
                name: "Aspirin".into(),
                dosage: None,
                schedule: None,
                notes: None,
            })
            .unwrap();

        let removed = store.delete_medication(&record.id).unwrap().unwrap();
        assert_eq!(removed.name, "Aspirin");

        // A second delete of the same id is a no-op.
        assert!(store.delete_medication(&record.id).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_collection_degrades_to_empty() {
        let store = setup_store();
        store
            .db
            .write_value("healthStats", "{not json")
            .unwrap();

        assert!(store.list_health_stats().is_empty());

        // The store stays writable afterwards.
        store
            .add_health_stat(HealthStatInput {
                kind: StatKind::Sleep,
                value: "8".into(),
                notes: None,
            })
            .unwrap();
        assert_eq!(store.list_health_stats().len(), 1);
    }

    #[test]
    fn test_snapshot_does_not_write() {
        let store = setup_store();
        store
            .record_derived_medications(&[DerivedMedication {
                name: "Aspirin".into(),
                dosage: Some("80mg".into()),
                schedule: None,
            }])
            .unwrap();

        let before = store.raw_collection("healthRecords");
        let snapshot = store.medications_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.raw_collection("healthRecords"), before);

        // The compacting load does persist.
        store.load_medications().unwrap();
        assert!(store.raw_collection("healthRecords").is_some());
    }
}
