//! # Record services
//!
//! Seams to the knowledge base. The annotator never blocks on them: a
//! failed or slow search shows no results, a failed creation is reported
//! for the one token it concerns.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::schema::{StatementGroupPayload, Term};

pub const FALLBACK_LANGUAGE: &str = "en";
pub const NO_LABEL: &str = "(no label)";

/// Labels and descriptions of one record, keyed by language code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}

/// Search results keyed by record id
pub type SearchResults = BTreeMap<String, RecordSummary>;

/// Everything needed to create a record for a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSeed {
    pub terms: Vec<Term>,
    pub statements: Vec<StatementGroupPayload>,
}

#[async_trait]
pub trait RecordSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults, ServiceError>;
}

#[async_trait]
pub trait RecordCreation: Send + Sync {
    /// Create a record and return its display id
    async fn create(&self, seed: &RecordSeed) -> Result<String, ServiceError>;
}

/// One row of the search suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
}

/// Label in `language`, else the fallback language marked as such, else
/// a placeholder
pub fn resolve_label(labels: &BTreeMap<String, String>, language: &str) -> String {
    if let Some(label) = labels.get(language) {
        return label.clone();
    }
    match labels.get(FALLBACK_LANGUAGE) {
        Some(label) => format!("({FALLBACK_LANGUAGE}) {label}"),
        None => NO_LABEL.to_string(),
    }
}

/// Suggestions for `query`. A blank query, a failed search and a search
/// that outlives `timeout` all give no suggestions.
pub async fn search_candidates(
    search: &dyn RecordSearch,
    query: &str,
    language: &str,
    timeout: Duration,
) -> Vec<Candidate> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let results = match tokio::time::timeout(timeout, search.search(query)).await {
        Ok(Ok(results)) => results,
        Ok(Err(err)) => {
            warn!(query, error = %err, "Record search failed");
            return Vec::new();
        }
        Err(_) => {
            let err = ServiceError::Timeout(timeout.as_millis() as u64);
            warn!(query, error = %err, "Record search failed");
            return Vec::new();
        }
    };

    debug!(query, results = results.len(), "Record search finished");
    results
        .into_iter()
        .map(|(id, summary)| Candidate {
            label: resolve_label(&summary.labels, language),
            description: summary
                .descriptions
                .get(language)
                .or_else(|| summary.descriptions.get(FALLBACK_LANGUAGE))
                .cloned(),
            id,
        })
        .collect()
}
