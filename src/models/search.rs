// src/models/search.rs - Query, candidate, verdict and per-query result records
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A single search request: a person's name plus an optional birth year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    name: String,
    birth_year: Option<i32>,
}

impl Query {
    pub fn new(name: impl Into<String>, birth_year: Option<i32>) -> Result<Self, SearchError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(SearchError::InvalidQuery(
                "query name must not be empty".to_string(),
            ));
        }
        Ok(Self { name, birth_year })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }
}

/// One row returned by the external search collaborator, already parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub location: String,
}

impl CandidateRecord {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "EXACT")]
    Exact,
    #[serde(rename = "PARTIAL")]
    Partial,
    #[serde(rename = "NONE")]
    NoMatch,
}

impl MatchType {
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchType::NoMatch)
    }

    pub fn display_category(&self) -> &'static str {
        match self {
            MatchType::Exact => "EXACT MATCH",
            MatchType::Partial => "PARTIAL MATCH",
            MatchType::NoMatch => "NOT MATCHED",
        }
    }
}

/// The classifier's decision for one (query, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchVerdict {
    pub candidate: CandidateRecord,
    pub match_type: MatchType,
    pub confidence: f64,
    pub reasoning: String,
    /// Only present when the query carried a birth year.
    pub within_expected_range: Option<bool>,
}

/// Query-level category derived from the verdict multiset (or the failure kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchCategory {
    #[serde(rename = "EXACT MATCH")]
    Exact,
    #[serde(rename = "PARTIAL MATCH")]
    Partial,
    #[serde(rename = "NO MATCH")]
    NoMatch,
    #[serde(rename = "NO RESULTS")]
    NoResults,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "TIMEOUT")]
    Timeout,
}

impl MatchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::Exact => "EXACT MATCH",
            MatchCategory::Partial => "PARTIAL MATCH",
            MatchCategory::NoMatch => "NO MATCH",
            MatchCategory::NoResults => "NO RESULTS",
            MatchCategory::Error => "ERROR",
            MatchCategory::Timeout => "TIMEOUT",
        }
    }
}

impl std::fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the batch classifier for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchClassification {
    pub category: MatchCategory,
    pub reasoning: String,
    pub verdicts: Vec<MatchVerdict>,
    pub exact_count: usize,
    pub partial_count: usize,
}

/// What the external executor hands back for a single query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSearchOutcome {
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
    #[serde(default)]
    pub raw_status: String,
    #[serde(default)]
    pub error: Option<String>,
}

pub const RAW_STATUS_OK: &str = "ok";
pub const RAW_STATUS_TIMEOUT: &str = "timeout";
pub const RAW_STATUS_ERROR: &str = "error";

impl RawSearchOutcome {
    pub fn found(candidates: Vec<CandidateRecord>) -> Self {
        Self {
            candidates,
            raw_status: RAW_STATUS_OK.to_string(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            raw_status: RAW_STATUS_ERROR.to_string(),
            error: Some(message.into()),
        }
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            raw_status: RAW_STATUS_TIMEOUT.to_string(),
            error: Some(message.into()),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.raw_status.trim().eq_ignore_ascii_case(RAW_STATUS_TIMEOUT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SearchStatus {
    Match,
    NoMatch,
    Error,
    Timeout,
}

impl SearchStatus {
    pub fn emoji(&self) -> &'static str {
        match self {
            SearchStatus::Match => "✅",
            SearchStatus::NoMatch => "➖",
            SearchStatus::Error => "❌",
            SearchStatus::Timeout => "⏰",
        }
    }
}

/// Final, immutable record for one query within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub status: SearchStatus,
    pub matches_found: usize,
    pub exact_matches: usize,
    pub partial_matches: usize,
    pub match_category: MatchCategory,
    pub match_reasoning: String,
    pub detailed_results: Vec<MatchVerdict>,
    pub search_duration: f64,
    pub birth_year: Option<i32>,
    pub error: Option<String>,
    pub chunk_id: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

const UNKNOWN_FAILURE: &str = "search failed without an error message";

impl SearchResult {
    pub fn classified(
        query: &Query,
        classification: BatchClassification,
        search_duration: f64,
        chunk_id: Option<usize>,
    ) -> Self {
        let matches_found = classification.exact_count + classification.partial_count;
        let status = if matches_found > 0 {
            SearchStatus::Match
        } else {
            SearchStatus::NoMatch
        };
        Self {
            name: query.name().to_string(),
            status,
            matches_found,
            exact_matches: classification.exact_count,
            partial_matches: classification.partial_count,
            match_category: classification.category,
            match_reasoning: classification.reasoning,
            detailed_results: classification.verdicts,
            search_duration,
            birth_year: query.birth_year(),
            error: None,
            chunk_id,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(
        query: &Query,
        error: impl Into<String>,
        search_duration: f64,
        chunk_id: Option<usize>,
    ) -> Self {
        let error = non_empty_message(error.into());
        Self::unsuccessful(
            query,
            SearchStatus::Error,
            MatchCategory::Error,
            format!("Search failed: {}", error),
            error,
            search_duration,
            chunk_id,
        )
    }

    pub fn timed_out(
        query: &Query,
        error: impl Into<String>,
        search_duration: f64,
        chunk_id: Option<usize>,
    ) -> Self {
        let error = non_empty_message(error.into());
        Self::unsuccessful(
            query,
            SearchStatus::Timeout,
            MatchCategory::Timeout,
            format!("Search timed out after {:.1}s", search_duration),
            error,
            search_duration,
            chunk_id,
        )
    }

    fn unsuccessful(
        query: &Query,
        status: SearchStatus,
        match_category: MatchCategory,
        match_reasoning: String,
        error: String,
        search_duration: f64,
        chunk_id: Option<usize>,
    ) -> Self {
        Self {
            name: query.name().to_string(),
            status,
            matches_found: 0,
            exact_matches: 0,
            partial_matches: 0,
            match_category,
            match_reasoning,
            detailed_results: Vec::new(),
            search_duration,
            birth_year: query.birth_year(),
            error: Some(error),
            chunk_id,
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == SearchStatus::Error
    }

    /// Matching verdicts ordered by confidence, highest first. Ties keep input order.
    pub fn ranked_matches(&self) -> Vec<&MatchVerdict> {
        let mut ranked: Vec<&MatchVerdict> = self
            .detailed_results
            .iter()
            .filter(|v| v.match_type.is_match())
            .collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked
    }
}

fn non_empty_message(message: String) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        UNKNOWN_FAILURE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(name: &str, match_type: MatchType, confidence: f64) -> MatchVerdict {
        MatchVerdict {
            candidate: CandidateRecord::new(name, "1990", "NSW"),
            match_type,
            confidence,
            reasoning: String::new(),
            within_expected_range: None,
        }
    }

    #[test]
    fn test_query_rejects_blank_name() {
        assert!(Query::new("   ", None).is_err());
        let q = Query::new("  Anthony Bek ", Some(1980)).unwrap();
        assert_eq!(q.name(), "Anthony Bek");
        assert_eq!(q.birth_year(), Some(1980));
    }

    #[test]
    fn test_failed_result_always_has_message() {
        let q = Query::new("Jane Doe", None).unwrap();
        let result = SearchResult::failed(&q, "   ", 0.4, Some(2));
        assert_eq!(result.status, SearchStatus::Error);
        assert_eq!(result.matches_found, 0);
        assert_eq!(result.error.as_deref(), Some(UNKNOWN_FAILURE));
        assert_eq!(result.match_category, MatchCategory::Error);
        assert_eq!(result.chunk_id, Some(2));
    }

    #[test]
    fn test_classified_result_counts_and_status() {
        let q = Query::new("John Smith", None).unwrap();
        let classification = BatchClassification {
            category: MatchCategory::Partial,
            reasoning: "1 partial match(es) found".to_string(),
            verdicts: vec![
                verdict("JOHN SMYTHE", MatchType::NoMatch, 0.0),
                verdict("JON SMITH", MatchType::Partial, 0.8),
            ],
            exact_count: 0,
            partial_count: 1,
        };
        let result = SearchResult::classified(&q, classification, 1.2, Some(1));
        assert_eq!(result.status, SearchStatus::Match);
        assert_eq!(result.matches_found, 1);
        assert!(result.exact_matches + result.partial_matches <= result.matches_found);
        assert!(result.matches_found <= result.detailed_results.len());
    }

    #[test]
    fn test_ranked_matches_sorted_by_confidence() {
        let q = Query::new("John Smith", None).unwrap();
        let classification = BatchClassification {
            category: MatchCategory::Exact,
            reasoning: String::new(),
            verdicts: vec![
                verdict("JON SMITH", MatchType::Partial, 0.8),
                verdict("BOB JONES", MatchType::NoMatch, 0.0),
                verdict("JOHN SMITH", MatchType::Exact, 1.0),
                verdict("JOHNNY SMITH", MatchType::Partial, 0.95),
            ],
            exact_count: 1,
            partial_count: 2,
        };
        let result = SearchResult::classified(&q, classification, 0.0, None);
        let names: Vec<&str> = result
            .ranked_matches()
            .iter()
            .map(|v| v.candidate.name.as_str())
            .collect();
        assert_eq!(names, vec!["JOHN SMITH", "JOHNNY SMITH", "JON SMITH"]);
    }

    #[test]
    fn test_serialized_field_names_are_stable() {
        let q = Query::new("Jane Doe", Some(1975)).unwrap();
        let result = SearchResult::timed_out(&q, "executor deadline", 30.0, Some(1));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "Timeout");
        assert_eq!(json["match_category"], "TIMEOUT");
        assert_eq!(json["birth_year"], 1975);
        assert_eq!(json["chunk_id"], 1);
        assert!(json.get("detailed_results").is_some());
    }

    #[test]
    fn test_raw_outcome_timeout_detection() {
        assert!(RawSearchOutcome::timed_out("slow").is_timeout());
        let mut outcome = RawSearchOutcome::found(Vec::new());
        assert!(!outcome.is_timeout());
        outcome.raw_status = " TimeOut ".to_string();
        assert!(outcome.is_timeout());
    }
}
