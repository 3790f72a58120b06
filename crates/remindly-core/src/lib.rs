//! Remindly Core Library
//!
//! Local-first record store for personal medication and health-record
//! tracking.
//!
//! # Architecture
//!
//! ```text
//! Add-medication form ─────────────┐
//!                                  ▼
//! Chat message ─► mention     RecordStore ────► collections (SQLite KV)
//!                 capture ─────────┤                healthRecords
//!                                  │                medications   (raw, chat-derived)
//!                                  │                healthStats
//!      merge on load:              │                medicalHistory
//!      medications → healthRecords │
//!      (compaction on read)        ▼
//!                            UniFFI surface ──► mobile shell
//! ```
//!
//! # Core Principle
//!
//! **The store owns the collections.** Presentation code holds only derived
//! copies obtained through the store's API and never reads or writes the
//! underlying keys directly.
//!
//! # Modules
//!
//! - [`db`]: SQLite-backed key-value collection storage
//! - [`models`]: Domain types (MedicationRecord, HealthStatRecord, MedicalHistoryRecord)
//! - [`store`]: The record store: CRUD, merge, dedup, ordering, validation
//! - [`assistant`]: Canned-response chat assistant and medication-mention capture

pub mod assistant;
pub mod db;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    DerivedMedication, HealthStatInput, HealthStatRecord, HistoryKind, MedicalHistoryInput,
    MedicalHistoryRecord, MedicationInput, MedicationRecord, StatKind,
};
pub use store::{RecordStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RemindlyError {
    #[error("Validation error: {0} must not be empty")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<store::StoreError> for RemindlyError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::Validation { field } => RemindlyError::Validation(field.into()),
            store::StoreError::NotFound { id } => RemindlyError::NotFound(id),
            store::StoreError::Storage(e) => RemindlyError::Storage(e.to_string()),
        }
    }
}

impl From<db::DbError> for RemindlyError {
    fn from(e: db::DbError) -> Self {
        RemindlyError::Storage(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RemindlyError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        RemindlyError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the record store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<RemindlyCore>, RemindlyError> {
    let store = RecordStore::open(&path)?;
    Ok(Arc::new(RemindlyCore {
        store: Mutex::new(store),
    }))
}

/// Create an in-memory record store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<RemindlyCore>, RemindlyError> {
    let store = RecordStore::open_in_memory()?;
    Ok(Arc::new(RemindlyCore {
        store: Mutex::new(store),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
///
/// Each method performs its whole read-modify-write cycle under the lock,
/// so callers never observe an intermediate collection state.
#[derive(uniffi::Object)]
pub struct RemindlyCore {
    store: Mutex<RecordStore>,
}

#[uniffi::export]
impl RemindlyCore {
    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Load the merged medication list (compacts chat-derived entries into
    /// the primary collection as a side effect).
    pub fn load_medications(&self) -> Result<Vec<FfiMedication>, RemindlyError> {
        let store = self.store.lock()?;
        let records = store.load_medications()?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// The merged medication view without the compaction write.
    pub fn medications_snapshot(&self) -> Result<Vec<FfiMedication>, RemindlyError> {
        let store = self.store.lock()?;
        Ok(store
            .medications_snapshot()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Add a medication from the add-medication form.
    pub fn add_medication(
        &self,
        input: FfiMedicationInput,
    ) -> Result<FfiMedication, RemindlyError> {
        let store = self.store.lock()?;
        let record = store.add_medication(input.into())?;
        Ok(record.into())
    }

    /// Replace the medication with the given id.
    pub fn update_medication(
        &self,
        id: String,
        record: FfiMedication,
    ) -> Result<FfiMedication, RemindlyError> {
        let store = self.store.lock()?;
        let updated = store.update_medication(&id, record.into())?;
        Ok(updated.into())
    }

    /// Delete a medication; returns the removed record, if any.
    pub fn delete_medication(
        &self,
        id: String,
    ) -> Result<Option<FfiMedication>, RemindlyError> {
        let store = self.store.lock()?;
        let removed = store.delete_medication(&id)?;
        Ok(removed.map(Into::into))
    }

    // =========================================================================
    // Health Statistic Operations
    // =========================================================================

    pub fn list_health_stats(&self) -> Result<Vec<FfiHealthStat>, RemindlyError> {
        let store = self.store.lock()?;
        Ok(store
            .list_health_stats()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn add_health_stat(
        &self,
        input: FfiHealthStatInput,
    ) -> Result<FfiHealthStat, RemindlyError> {
        let store = self.store.lock()?;
        let record = store.add_health_stat(input.into())?;
        Ok(record.into())
    }

    pub fn update_health_stat(
        &self,
        id: String,
        record: FfiHealthStat,
    ) -> Result<FfiHealthStat, RemindlyError> {
        let store = self.store.lock()?;
        let updated = store.update_health_stat(&id, record.into())?;
        Ok(updated.into())
    }

    pub fn delete_health_stat(
        &self,
        id: String,
    ) -> Result<Option<FfiHealthStat>, RemindlyError> {
        let store = self.store.lock()?;
        let removed = store.delete_health_stat(&id)?;
        Ok(removed.map(Into::into))
    }

    // =========================================================================
    // Medical History Operations
    // =========================================================================

    pub fn list_medical_history(&self) -> Result<Vec<FfiMedicalHistory>, RemindlyError> {
        let store = self.store.lock()?;
        Ok(store
            .list_medical_history()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn add_medical_history(
        &self,
        input: FfiMedicalHistoryInput,
    ) -> Result<FfiMedicalHistory, RemindlyError> {
        let store = self.store.lock()?;
        let record = store.add_medical_history(input.into())?;
        Ok(record.into())
    }

    pub fn update_medical_history(
        &self,
        id: String,
        record: FfiMedicalHistory,
    ) -> Result<FfiMedicalHistory, RemindlyError> {
        let store = self.store.lock()?;
        let updated = store.update_medical_history(&id, record.into())?;
        Ok(updated.into())
    }

    pub fn delete_medical_history(
        &self,
        id: String,
    ) -> Result<Option<FfiMedicalHistory>, RemindlyError> {
        let store = self.store.lock()?;
        let removed = store.delete_medical_history(&id)?;
        Ok(removed.map(Into::into))
    }

    // =========================================================================
    // Chat Assistant
    // =========================================================================

    /// Produce the assistant's reply for a message and capture any
    /// medication mentions into the secondary collection.
    pub fn send_chat_message(&self, message: String) -> Result<FfiChatReply, RemindlyError> {
        let captured = assistant::detect_medications(&message);
        if !captured.is_empty() {
            let store = self.store.lock()?;
            store.record_derived_medications(&captured)?;
        }
        Ok(FfiChatReply {
            reply: assistant::reply(&message),
            captured: captured.into_iter().map(Into::into).collect(),
        })
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// Dates cross the FFI boundary as RFC 3339 strings; a value that fails to
/// parse is replaced with the current instant rather than rejected.
fn parse_ffi_date(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// FFI-safe medication record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub date: String,
    pub name: String,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

impl From<MedicationRecord> for FfiMedication {
    fn from(record: MedicationRecord) -> Self {
        Self {
            id: record.id,
            date: record.date.to_rfc3339(),
            name: record.name,
            dosage: record.dosage,
            schedule: record.schedule,
            notes: record.notes,
        }
    }
}

impl From<FfiMedication> for MedicationRecord {
    fn from(record: FfiMedication) -> Self {
        MedicationRecord {
            id: record.id,
            date: parse_ffi_date(&record.date),
            name: record.name,
            dosage: record.dosage,
            schedule: record.schedule,
            notes: record.notes,
        }
    }
}

/// FFI-safe medication form payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationInput {
    pub name: String,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiMedicationInput> for MedicationInput {
    fn from(input: FfiMedicationInput) -> Self {
        MedicationInput {
            name: input.name,
            dosage: input.dosage,
            schedule: input.schedule,
            notes: input.notes,
        }
    }
}

/// FFI-safe health measurement, with its display label and unit resolved.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthStat {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub label: String,
    pub unit: String,
    pub value: String,
    pub notes: Option<String>,
}

impl From<HealthStatRecord> for FfiHealthStat {
    fn from(record: HealthStatRecord) -> Self {
        Self {
            id: record.id,
            date: record.date.to_rfc3339(),
            label: record.kind.label().to_string(),
            unit: record.kind.unit().to_string(),
            kind: record.kind.tag().to_string(),
            value: record.value,
            notes: record.notes,
        }
    }
}

impl From<FfiHealthStat> for HealthStatRecord {
    fn from(record: FfiHealthStat) -> Self {
        HealthStatRecord {
            id: record.id,
            date: parse_ffi_date(&record.date),
            kind: StatKind::from(record.kind),
            value: record.value,
            notes: record.notes,
        }
    }
}

/// FFI-safe measurement form payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthStatInput {
    pub kind: String,
    pub value: String,
    pub notes: Option<String>,
}

impl From<FfiHealthStatInput> for HealthStatInput {
    fn from(input: FfiHealthStatInput) -> Self {
        HealthStatInput {
            kind: StatKind::from(input.kind),
            value: input.value,
            notes: input.notes,
        }
    }
}

/// FFI-safe medical history entry, with its display label resolved.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalHistory {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub label: String,
    pub provider: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl From<MedicalHistoryRecord> for FfiMedicalHistory {
    fn from(record: MedicalHistoryRecord) -> Self {
        Self {
            id: record.id,
            date: record.date.to_rfc3339(),
            label: record.kind.label().to_string(),
            kind: record.kind.tag().to_string(),
            provider: record.provider,
            location: record.location,
            notes: record.notes,
        }
    }
}

impl From<FfiMedicalHistory> for MedicalHistoryRecord {
    fn from(record: FfiMedicalHistory) -> Self {
        MedicalHistoryRecord {
            id: record.id,
            date: parse_ffi_date(&record.date),
            kind: HistoryKind::from(record.kind),
            provider: record.provider,
            location: record.location,
            notes: record.notes,
        }
    }
}

/// FFI-safe history form payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalHistoryInput {
    pub kind: String,
    pub provider: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiMedicalHistoryInput> for MedicalHistoryInput {
    fn from(input: FfiMedicalHistoryInput) -> Self {
        MedicalHistoryInput {
            kind: HistoryKind::from(input.kind),
            provider: input.provider,
            location: input.location,
            notes: input.notes,
        }
    }
}

/// A medication mention captured from a chat message.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCapturedMedication {
    pub name: String,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
}

impl From<DerivedMedication> for FfiCapturedMedication {
    fn from(raw: DerivedMedication) -> Self {
        Self {
            name: raw.name,
            dosage: raw.dosage,
            schedule: raw.schedule,
        }
    }
}

/// Assistant response to a chat message.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChatReply {
    pub reply: String,
    pub captured: Vec<FfiCapturedMedication>,
}
