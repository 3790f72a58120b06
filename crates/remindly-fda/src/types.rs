//! openFDA drug-label response types.
//!
//! Field-for-field mirror of the label documents the API returns. Every
//! narrative section is optional; label documents are sparse and vary
//! wildly between products.

use serde::{Deserialize, Serialize};

/// Structured product metadata block on a label document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OpenFda {
    #[serde(default)]
    pub brand_name: Option<Vec<String>>,
    #[serde(default)]
    pub generic_name: Option<Vec<String>>,
    #[serde(default)]
    pub manufacturer_name: Option<Vec<String>>,
    #[serde(default)]
    pub product_type: Option<Vec<String>>,
    #[serde(default)]
    pub route: Option<Vec<String>>,
    #[serde(default)]
    pub substance_name: Option<Vec<String>>,
}

/// A single drug-label document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrugLabel {
    #[serde(default)]
    pub openfda: OpenFda,
    #[serde(default)]
    pub purpose: Option<Vec<String>>,
    #[serde(default)]
    pub indications_and_usage: Option<Vec<String>>,
    #[serde(default)]
    pub dosage_and_administration: Option<Vec<String>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub active_ingredient: Option<Vec<String>>,
    #[serde(default)]
    pub inactive_ingredient: Option<Vec<String>>,
    #[serde(default)]
    pub warnings_and_cautions: Option<Vec<String>>,
    #[serde(default)]
    pub drug_interactions: Option<Vec<String>>,
    #[serde(default)]
    pub pregnancy: Option<Vec<String>>,
}

impl DrugLabel {
    /// Best display name: brand name, else generic name, else substance.
    pub fn display_name(&self) -> Option<&str> {
        fn first(names: &Option<Vec<String>>) -> Option<&str> {
            names
                .as_ref()
                .and_then(|n| n.first())
                .map(String::as_str)
        }
        first(&self.openfda.brand_name)
            .or_else(|| first(&self.openfda.generic_name))
            .or_else(|| first(&self.openfda.substance_name))
    }
}

/// Result-count bookkeeping in the response meta block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultsMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Response meta block (disclaimer, license, result counts).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchMeta {
    #[serde(default)]
    pub disclaimer: String,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub results: ResultsMeta,
}

/// A drug-label search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub meta: SearchMeta,
    #[serde(default)]
    pub results: Vec<DrugLabel>,
}
