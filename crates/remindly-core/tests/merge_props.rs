//! Property tests for the medication merge pass.

use proptest::prelude::*;

use remindly_core::models::{DerivedMedication, MedicationInput};
use remindly_core::store::RecordStore;

/// Re-case a name using the mask's bits, one per character.
fn recase(name: &str, mask: u32) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << (i % 32)) != 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

fn user_input(name: &str) -> MedicationInput {
    MedicationInput {
        name: name.into(),
        dosage: None,
        schedule: None,
        notes: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Overlapping names never grow the primary collection, whatever the
    /// casing of the derived entries.
    #[test]
    fn merge_never_duplicates_overlapping_names(
        names in proptest::collection::hash_set("[a-z]{3,10}", 1..6),
        mask in any::<u32>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let store = RecordStore::open_in_memory().unwrap();
        for name in &names {
            store.add_medication(user_input(name)).unwrap();
        }

        let secondary: Vec<DerivedMedication> = names
            .iter()
            .enumerate()
            .map(|(i, name)| DerivedMedication {
                name: recase(name, mask.rotate_left(i as u32)),
                dosage: Some("10mg".into()),
                schedule: None,
            })
            .collect();
        store.record_derived_medications(&secondary).unwrap();

        let first = store.load_medications().unwrap();
        prop_assert_eq!(first.len(), names.len());

        let second = store.load_medications().unwrap();
        prop_assert_eq!(second.len(), names.len());
    }

    /// Derived-only names each produce exactly one record, and repeated
    /// loads stay stable once they are compacted in.
    #[test]
    fn merge_adds_each_new_name_exactly_once(
        names in proptest::collection::hash_set("[a-z]{3,10}", 1..6),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let store = RecordStore::open_in_memory().unwrap();

        let secondary: Vec<DerivedMedication> = names
            .iter()
            .map(|name| DerivedMedication {
                name: name.clone(),
                dosage: None,
                schedule: None,
            })
            .collect();
        store.record_derived_medications(&secondary).unwrap();

        for _ in 0..3 {
            let loaded = store.load_medications().unwrap();
            prop_assert_eq!(loaded.len(), names.len());
        }
    }

    /// The merged view is always sorted newest first.
    #[test]
    fn merged_view_is_sorted_descending(
        user_names in proptest::collection::hash_set("[a-z]{3,10}", 1..4),
        derived_names in proptest::collection::hash_set("[A-Z][a-z]{3,9}", 1..4),
    ) {
        let store = RecordStore::open_in_memory().unwrap();
        for name in &user_names {
            store.add_medication(user_input(name)).unwrap();
        }
        let secondary: Vec<DerivedMedication> = derived_names
            .iter()
            .map(|name| DerivedMedication {
                name: name.clone(),
                dosage: None,
                schedule: None,
            })
            .collect();
        store.record_derived_medications(&secondary).unwrap();

        let loaded = store.load_medications().unwrap();
        for pair in loaded.windows(2) {
            prop_assert!(pair[0].date >= pair[1].date);
        }
    }
}
