//! Medical history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of medical history entry.
///
/// `other` is itself a known tag; anything outside the enumerated set is
/// carried through as [`HistoryKind::Unknown`] with its raw tag as label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HistoryKind {
    DoctorVisit,
    Procedure,
    Vaccination,
    Other,
    /// Unrecognized tag, preserved verbatim
    Unknown(String),
}

impl HistoryKind {
    /// The persisted kebab-case tag.
    pub fn tag(&self) -> &str {
        match self {
            HistoryKind::DoctorVisit => "doctor-visit",
            HistoryKind::Procedure => "procedure",
            HistoryKind::Vaccination => "vaccination",
            HistoryKind::Other => "other",
            HistoryKind::Unknown(tag) => tag,
        }
    }

    /// Display label; unrecognized kinds fall back to their raw tag.
    pub fn label(&self) -> &str {
        match self {
            HistoryKind::DoctorVisit => "Doctor Visit",
            HistoryKind::Procedure => "Medical Procedure",
            HistoryKind::Vaccination => "Vaccination",
            HistoryKind::Other => "Other",
            HistoryKind::Unknown(tag) => tag,
        }
    }
}

impl From<String> for HistoryKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "doctor-visit" => HistoryKind::DoctorVisit,
            "procedure" => HistoryKind::Procedure,
            "vaccination" => HistoryKind::Vaccination,
            "other" => HistoryKind::Other,
            _ => HistoryKind::Unknown(tag),
        }
    }
}

impl From<HistoryKind> for String {
    fn from(kind: HistoryKind) -> Self {
        kind.tag().to_string()
    }
}

/// A medical history entry (visit, procedure, vaccination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalHistoryRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// Doctor or provider name
    pub provider: String,
    /// Hospital or clinic name
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Form-entered history payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalHistoryInput {
    pub kind: HistoryKind,
    pub provider: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl MedicalHistoryRecord {
    /// Create a record from a form submission.
    pub fn new(input: MedicalHistoryInput) -> Self {
        let now = Utc::now();
        Self {
            id: super::timestamp_id(now),
            date: now,
            kind: input.kind,
            provider: input.provider,
            location: input.location,
            notes: input.notes,
        }
    }
}
