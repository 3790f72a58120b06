//! Medication merge pass.
//!
//! The chat flow appends raw `{name, dosage, schedule}` entries to the
//! secondary `medications` collection. On every medication load the store
//! folds entries the user has not already recorded into the primary
//! collection, matching names case-insensitively. Once a name exists in
//! the primary collection, later derived variants of it are suppressed;
//! their dosage/schedule details are not grafted onto the existing record.

use crate::models::{DerivedMedication, MedicationRecord};

/// Fold derived entries without a primary counterpart into the primary
/// collection. Returns the combined list and the number of records
/// synthesized.
///
/// Matching is performed against the growing combined list, so duplicate
/// names within the secondary collection itself also collapse to one
/// record.
pub fn merge_secondary(
    primary: Vec<MedicationRecord>,
    secondary: &[DerivedMedication],
) -> (Vec<MedicationRecord>, usize) {
    let mut combined = primary;
    let mut added = 0;

    for raw in secondary {
        if raw.name.trim().is_empty() {
            continue;
        }
        let exists = combined.iter().any(|record| record.name_matches(&raw.name));
        if !exists {
            combined.push(MedicationRecord::from_derived(raw));
            added += 1;
        }
    }

    (combined, added)
}
