//! Medication models.
//!
//! Medications reach the store through two producers: the add-medication
//! form ([`MedicationInput`]) and the chat flow, which stores raw
//! [`DerivedMedication`] entries in a separate collection until the next
//! merge pass synthesizes full records from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schedule used when neither producer supplied one.
pub const DEFAULT_SCHEDULE: &str = "Daily";

/// A medication entry in the merged, user-facing collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    /// Millisecond-epoch decimal string, `med-<millis>-<suffix>` when
    /// synthesized from a derived entry
    pub id: String,
    /// Creation instant
    pub date: DateTime<Utc>,
    /// Medication name; case is preserved, comparisons are case-insensitive
    pub name: String,
    /// Free-text dosage (e.g. "10mg", "1 tablet")
    #[serde(default)]
    pub dosage: Option<String>,
    /// Free-text cadence or time-of-day
    #[serde(default, alias = "time")]
    pub schedule: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Form-entered medication payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationInput {
    pub name: String,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

/// Raw medication entry as written by the chat flow.
///
/// Shape of the secondary `medications` collection; never shown directly,
/// only merged into the primary collection on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedMedication {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
}

impl MedicationRecord {
    /// Create a record from a form submission.
    pub fn new(input: MedicationInput) -> Self {
        let now = Utc::now();
        Self {
            id: super::timestamp_id(now),
            date: now,
            name: input.name,
            dosage: input.dosage,
            schedule: input
                .schedule
                .or_else(|| Some(DEFAULT_SCHEDULE.to_string())),
            notes: input.notes,
        }
    }

    /// Synthesize a record from a derived entry during a merge pass.
    ///
    /// The id carries a random suffix so bulk synthesis within one
    /// millisecond cannot collide. The derived entry's dosage doubles as
    /// the notes text, matching what the record screens display for
    /// chat-captured medications.
    pub fn from_derived(raw: &DerivedMedication) -> Self {
        let now = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id: format!("med-{}-{}", now.timestamp_millis(), &suffix[..8]),
            date: now,
            name: raw.name.clone(),
            dosage: raw.dosage.clone(),
            schedule: raw
                .schedule
                .clone()
                .or_else(|| Some(DEFAULT_SCHEDULE.to_string())),
            notes: raw.dosage.clone(),
        }
    }

    /// Case-insensitive name match against another medication name.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_medication_defaults_schedule() {
        let record = MedicationRecord::new(MedicationInput {
            name: "Aspirin".into(),
            dosage: Some("80mg".into()),
            schedule: None,
            notes: None,
        });
        assert_eq!(record.name, "Aspirin");
        assert_eq!(record.schedule.as_deref(), Some(DEFAULT_SCHEDULE));
        // Plain decimal millis, no prefix
        assert!(record.id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_from_derived_copies_dosage_into_notes() {
        let raw = DerivedMedication {
            name: "Metformin".into(),
            dosage: Some("500mg".into()),
            schedule: None,
        };
        let record = MedicationRecord::from_derived(&raw);
        assert_eq!(record.name, "Metformin");
        assert_eq!(record.dosage.as_deref(), Some("500mg"));
        assert_eq!(record.notes.as_deref(), Some("500mg"));
        assert_eq!(record.schedule.as_deref(), Some("Daily"));
        assert!(record.id.starts_with("med-"));
    }

    #[test]
    fn test_derived_ids_do_not_collide() {
        let raw = DerivedMedication {
            name: "Metformin".into(),
            dosage: None,
            schedule: None,
        };
        let a = MedicationRecord::from_derived(&raw);
        let b = MedicationRecord::from_derived(&raw);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_name_matches_ignores_case_and_padding() {
        let record = MedicationRecord::new(MedicationInput {
            name: "Aspirin".into(),
            dosage: None,
            schedule: None,
            notes: None,
        });
        assert!(record.name_matches("aspirin"));
        assert!(record.name_matches("  ASPIRIN "));
        assert!(!record.name_matches("ibuprofen"));
    }

    #[test]
    fn test_reads_legacy_time_field_as_schedule() {
        let json = r#"{
            "id": "1700000000000",
            "date": "2023-11-14T22:13:20Z",
            "name": "Aspirin",
            "time": "Morning"
        }"#;
        let record: MedicationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.schedule.as_deref(), Some("Morning"));
        assert_eq!(record.dosage, None);
    }
}
