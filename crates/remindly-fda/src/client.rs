//! Drug-label search client.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{DrugLabel, SearchResponse};

/// Public openFDA drug-label endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.fda.gov/drug/label.json";

/// Results requested per search.
const SEARCH_LIMIT: u32 = 25;

/// Client errors.
#[derive(Error, Debug)]
pub enum FdaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("openFDA returned status {0}")]
    Status(StatusCode),
}

pub type FdaResult<T> = Result<T, FdaError>;

/// The three query shapes tried in order, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTier {
    /// Parenthesized phrase across all text fields
    Broad,
    /// Exact substance-name field match
    SubstanceName,
    /// Bare keyword, most permissive
    Keyword,
}

impl QueryTier {
    /// All tiers, in fallback order.
    pub const ALL: [QueryTier; 3] = [
        QueryTier::Broad,
        QueryTier::SubstanceName,
        QueryTier::Keyword,
    ];

    /// Build the `search` expression for a query at this tier.
    pub fn expression(&self, query: &str) -> String {
        match self {
            QueryTier::Broad => format!("({})", query),
            QueryTier::SubstanceName => format!(
                "(_exists_:openfda.substance_name AND openfda.substance_name:\"{}\")",
                query
            ),
            QueryTier::Keyword => query.to_string(),
        }
    }
}

/// openFDA drug-label search client.
pub struct FdaClient {
    http: Client,
    base_url: String,
}

impl Default for FdaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FdaClient {
    /// Client against the public openFDA endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternate endpoint (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search labels for a free-text query.
    ///
    /// Tries the three [`QueryTier`]s in order and returns the first
    /// non-empty result set. A 404 from openFDA means "no matches" and
    /// falls through to the next tier, as does any other failure on a
    /// non-final tier; `Ok(None)` means all three tiers came up empty.
    pub fn search_drugs(&self, query: &str) -> FdaResult<Option<SearchResponse>> {
        let last = QueryTier::ALL.len() - 1;
        for (i, tier) in QueryTier::ALL.iter().enumerate() {
            match self.attempt(tier.expression(query)) {
                Ok(Some(response)) => {
                    debug!(?tier, results = response.results.len(), "search hit");
                    return Ok(Some(response));
                }
                Ok(None) => {
                    debug!(?tier, "no results, falling through");
                }
                Err(e) if i < last => {
                    warn!(?tier, error = %e, "search attempt failed, falling through");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Look up a single label by brand or generic name.
    pub fn drug_details(&self, name: &str) -> FdaResult<Option<DrugLabel>> {
        let expression = format!(
            "(openfda.brand_name:\"{}\" OR openfda.generic_name:\"{}\")",
            name, name
        );
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("search", expression.as_str()), ("limit", "1")])
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(FdaError::Status(response.status()));
        }

        let parsed: SearchResponse = response.json()?;
        Ok(parsed.results.into_iter().next())
    }

    /// One search attempt. `Ok(None)` covers both a 404 and an empty
    /// result array.
    fn attempt(&self, expression: String) -> FdaResult<Option<SearchResponse>> {
        let limit = SEARCH_LIMIT.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("search", expression.as_str()), ("limit", limit.as_str())])
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(FdaError::Status(response.status()));
        }

        let parsed: SearchResponse = response.json()?;
        if parsed.results.is_empty() {
            return Ok(None);
        }
        Ok(Some(parsed))
    }
}
