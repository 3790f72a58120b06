//! Canned-response health assistant.
//!
//! Backs the chat widget: produces a general-advice reply for any message
//! and scans the message for medication mentions. Captured mentions are
//! the source of the secondary `medications` collection. The record
//! screens advertise that medication history is tracked automatically when
//! mentioned in chat, and this module is what makes that true.

use sha2::{Digest, Sha256};

use crate::models::DerivedMedication;

/// Reply pool for the assistant.
const RESPONSES: [&str; 5] = [
    "Based on health guidelines, it's recommended to maintain a balanced diet and regular exercise for this condition.",
    "Many healthcare professionals suggest that adequate hydration and rest can help with these symptoms.",
    "According to medical research, there are several approaches to managing this. First, maintain a healthy lifestyle with regular exercise and a balanced diet. Second, ensure you're getting enough sleep.",
    "I'd recommend consulting with your doctor, but generally this kind of health concern can be addressed with lifestyle changes.",
    "From a healthcare perspective, it's important to note that these symptoms should be monitored closely.",
];

const CONSULT_SUFFIX: &str =
    " Remember to consult with a healthcare professional for personalized medical advice.";

/// Medication names the mention scanner recognizes.
const KNOWN_MEDICATIONS: [&str; 26] = [
    "Aspirin",
    "Ibuprofen",
    "Acetaminophen",
    "Paracetamol",
    "Naproxen",
    "Amoxicillin",
    "Azithromycin",
    "Metformin",
    "Insulin",
    "Lisinopril",
    "Amlodipine",
    "Losartan",
    "Metoprolol",
    "Atorvastatin",
    "Simvastatin",
    "Omeprazole",
    "Ranitidine",
    "Cetirizine",
    "Loratadine",
    "Prednisone",
    "Gabapentin",
    "Sertraline",
    "Fluoxetine",
    "Levothyroxine",
    "Warfarin",
    "Melatonin",
];

/// Jaro-Winkler floor for accepting a misspelled medication name.
const SIMILARITY_THRESHOLD: f64 = 0.92;

const DOSE_UNITS: [&str; 16] = [
    "mg", "mcg", "g", "ml", "iu", "units", "unit", "tablets", "tablet", "tabs", "tab",
    "capsules", "capsule", "caps", "drops", "puffs",
];

/// Cadence phrases mapped to schedule labels; first match wins, so the
/// more specific phrases come first.
const SCHEDULES: [(&str, &str); 13] = [
    ("twice daily", "Twice daily"),
    ("twice a day", "Twice daily"),
    ("every morning", "Morning"),
    ("every evening", "Evening"),
    ("every night", "Night"),
    ("at night", "Night"),
    ("bedtime", "Bedtime"),
    ("morning", "Morning"),
    ("evening", "Evening"),
    ("every week", "Weekly"),
    ("weekly", "Weekly"),
    ("every day", "Daily"),
    ("daily", "Daily"),
];

/// Produce the assistant's reply for a message.
///
/// Selection is a digest of the normalized message, so a repeated question
/// gets the same advice back.
pub fn reply(message: &str) -> String {
    let digest = Sha256::digest(message.trim().to_lowercase().as_bytes());
    let index = usize::from(digest[0]) % RESPONSES.len();
    format!("{}{}", RESPONSES[index], CONSULT_SUFFIX)
}

/// Scan free text for medication mentions.
///
/// A mention is a known medication name (exact, or within typo distance),
/// optionally followed by a dose token ("80mg", "200 mg", "2 tablets"),
/// with any cadence phrase in the message as its schedule. Each name is
/// reported once per message.
pub fn detect_medications(text: &str) -> Vec<DerivedMedication> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let schedule = extract_schedule(text);
    let mut found: Vec<DerivedMedication> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if word.len() < 4 {
            continue;
        }
        let Some(canonical) = match_known(&word.to_lowercase()) else {
            continue;
        };
        if found.iter().any(|m| m.name == canonical) {
            continue;
        }
        found.push(DerivedMedication {
            name: canonical.to_string(),
            dosage: extract_dosage(&tokens[i + 1..]),
            schedule: schedule.clone(),
        });
    }

    found
}

/// Match a lowercased word against the known medication list.
fn match_known(word: &str) -> Option<&'static str> {
    for name in KNOWN_MEDICATIONS {
        let known = name.to_lowercase();
        if word == known || strsim::jaro_winkler(word, &known) >= SIMILARITY_THRESHOLD {
            return Some(name);
        }
    }
    None
}

/// Pull a dose out of the tokens following a medication name.
fn extract_dosage(following: &[&str]) -> Option<String> {
    let first = following
        .first()?
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '.')
        .trim_end_matches('.')
        .to_lowercase();

    // Number with attached unit: "80mg", "0.5ml"
    for unit in DOSE_UNITS {
        if let Some(num) = first.strip_suffix(unit) {
            if !num.is_empty() && num.parse::<f64>().is_ok() {
                return Some(first.clone());
            }
        }
    }

    // Separate number and unit: "200 mg", "2 tablets"
    if first.parse::<f64>().is_ok() {
        if let Some(second) = following.get(1) {
            let unit = second
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if DOSE_UNITS.contains(&unit.as_str()) {
                return Some(format!("{} {}", first, unit));
            }
        }
    }

    None
}

/// Find a cadence phrase anywhere in the message.
fn extract_schedule(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    SCHEDULES
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, label)| label.to_string())
}
