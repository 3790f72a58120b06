//! Health statistic models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of health measurement.
///
/// Open at the read boundary: unrecognized tags are carried through as
/// [`StatKind::Other`] and rendered with a fallback label rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatKind {
    BloodPressure,
    HeartRate,
    Weight,
    Sleep,
    Steps,
    Temperature,
    Glucose,
    Oxygen,
    /// Unrecognized tag, preserved verbatim
    Other(String),
}

impl StatKind {
    /// The persisted kebab-case tag.
    pub fn tag(&self) -> &str {
        match self {
            StatKind::BloodPressure => "blood-pressure",
            StatKind::HeartRate => "heart-rate",
            StatKind::Weight => "weight",
            StatKind::Sleep => "sleep",
            StatKind::Steps => "steps",
            StatKind::Temperature => "temperature",
            StatKind::Glucose => "glucose",
            StatKind::Oxygen => "oxygen",
            StatKind::Other(tag) => tag,
        }
    }

    /// Display label; unrecognized kinds fall back to their raw tag.
    pub fn label(&self) -> &str {
        match self {
            StatKind::BloodPressure => "Blood Pressure",
            StatKind::HeartRate => "Heart Rate",
            StatKind::Weight => "Weight",
            StatKind::Sleep => "Sleep",
            StatKind::Steps => "Steps",
            StatKind::Temperature => "Temperature",
            StatKind::Glucose => "Glucose",
            StatKind::Oxygen => "Oxygen",
            StatKind::Other(tag) => tag,
        }
    }

    /// Measurement unit shown next to the value; empty for unrecognized
    /// kinds.
    pub fn unit(&self) -> &str {
        match self {
            StatKind::BloodPressure => "mmHg",
            StatKind::HeartRate => "bpm",
            StatKind::Weight => "kg",
            StatKind::Sleep => "hours",
            StatKind::Steps => "steps",
            StatKind::Temperature => "°C",
            StatKind::Glucose => "mg/dL",
            StatKind::Oxygen => "%",
            StatKind::Other(_) => "",
        }
    }
}

impl From<String> for StatKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "blood-pressure" => StatKind::BloodPressure,
            "heart-rate" => StatKind::HeartRate,
            "weight" => StatKind::Weight,
            "sleep" => StatKind::Sleep,
            "steps" => StatKind::Steps,
            "temperature" => StatKind::Temperature,
            "glucose" => StatKind::Glucose,
            "oxygen" => StatKind::Oxygen,
            _ => StatKind::Other(tag),
        }
    }
}

impl From<StatKind> for String {
    fn from(kind: StatKind) -> Self {
        kind.tag().to_string()
    }
}

/// A single health measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: StatKind,
    pub value: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Form-entered measurement payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatInput {
    pub kind: StatKind,
    pub value: String,
    pub notes: Option<String>,
}

impl HealthStatRecord {
    /// Create a record from a form submission.
    pub fn new(input: HealthStatInput) -> Self {
        let now = Utc::now();
        Self {
            id: super::timestamp_id(now),
            date: now,
            kind: input.kind,
            value: input.value,
            notes: input.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kind_round_trip() {
        let json = serde_json::to_string(&StatKind::HeartRate).unwrap();
        assert_eq!(json, r#""heart-rate""#);

        let kind: StatKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, StatKind::HeartRate);
    }

    #[test]
    fn test_unknown_kind_preserved() {
        let kind: StatKind = serde_json::from_str(r#""vo2-max""#).unwrap();
        assert_eq!(kind, StatKind::Other("vo2-max".into()));
        assert_eq!(kind.label(), "vo2-max");
        assert_eq!(kind.unit(), "");

        // Survives re-serialization unchanged
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""vo2-max""#);
    }

    #[test]
    fn test_labels_and_units() {
        assert_eq!(StatKind::BloodPressure.label(), "Blood Pressure");
        assert_eq!(StatKind::BloodPressure.unit(), "mmHg");
        assert_eq!(StatKind::Glucose.unit(), "mg/dL");
        assert_eq!(StatKind::Oxygen.unit(), "%");
    }

    #[test]
    fn test_record_serializes_kind_as_type() {
        let record = HealthStatRecord::new(HealthStatInput {
            kind: StatKind::Weight,
            value: "72".into(),
            notes: None,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "weight");
        assert_eq!(json["value"], "72");
    }
}
