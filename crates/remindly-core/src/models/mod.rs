//! Domain models for the remindly record store.

mod health_stat;
mod medical_history;
mod medication;

pub use health_stat::*;
pub use medical_history::*;
pub use medication::*;

use chrono::{DateTime, Utc};

/// Record ID for form-created records: the creation instant as a
/// millisecond-epoch decimal string.
pub(crate) fn timestamp_id(date: DateTime<Utc>) -> String {
    date.timestamp_millis().to_string()
}
