// src/matching/batch.rs - Query-level aggregation of per-candidate verdicts
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::name::NameMatchClassifier;
use crate::models::{
    BatchClassification, CandidateRecord, MatchCategory, MatchType, MatchVerdict, Query,
};
use crate::utils::constants::DEFAULT_BIRTH_YEAR_TOLERANCE;

static YEAR_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").ok());

#[derive(Debug, Clone)]
pub struct BatchClassifier {
    matcher: NameMatchClassifier,
    birth_year_tolerance: i32,
}

impl Default for BatchClassifier {
    fn default() -> Self {
        Self::new(NameMatchClassifier::default(), DEFAULT_BIRTH_YEAR_TOLERANCE)
    }
}

impl BatchClassifier {
    pub fn new(matcher: NameMatchClassifier, birth_year_tolerance: i32) -> Self {
        Self {
            matcher,
            birth_year_tolerance,
        }
    }

    /// Classifies every candidate in input order and derives the query category.
    /// Birth year is reported per verdict and never changes `match_type`.
    pub fn classify_batch(
        &self,
        query: &Query,
        candidates: &[CandidateRecord],
    ) -> BatchClassification {
        let verdicts: Vec<MatchVerdict> = candidates
            .iter()
            .map(|candidate| {
                let name_match = self.matcher.classify(query.name(), &candidate.name);
                let within_expected_range = query
                    .birth_year()
                    .map(|year| self.birth_year_in_range(year, &candidate.date_of_birth));
                MatchVerdict {
                    candidate: candidate.clone(),
                    match_type: name_match.match_type,
                    confidence: name_match.confidence,
                    reasoning: name_match.reasoning,
                    within_expected_range,
                }
            })
            .collect();

        let exact_count = verdicts.iter().filter(|v| v.match_type == MatchType::Exact).count();
        let partial_count = verdicts.iter().filter(|v| v.match_type == MatchType::Partial).count();

        let (category, reasoning) = if candidates.is_empty() {
            (MatchCategory::NoResults, "No results returned".to_string())
        } else if exact_count > 0 {
            (MatchCategory::Exact, format!("{} exact match(es) found", exact_count))
        } else if partial_count > 0 {
            (MatchCategory::Partial, format!("{} partial match(es) found", partial_count))
        } else {
            (
                MatchCategory::NoMatch,
                format!("No matching names among {} candidate(s)", candidates.len()),
            )
        };

        debug!(
            "Classified {} candidate(s) for '{}': {} ({} exact, {} partial)",
            candidates.len(),
            query.name(),
            category,
            exact_count,
            partial_count
        );

        BatchClassification {
            category,
            reasoning,
            verdicts,
            exact_count,
            partial_count,
        }
    }

    /// Unparseable or missing dates count as out of range.
    fn birth_year_in_range(&self, expected: i32, date_of_birth: &str) -> bool {
        match extract_year(date_of_birth) {
            Some(year) => year.abs_diff(expected) <= self.birth_year_tolerance.max(0) as u32,
            None => false,
        }
    }
}

/// First standalone four-digit run in a free-form date string.
pub fn extract_year(date_of_birth: &str) -> Option<i32> {
    YEAR_PATTERN
        .as_ref()?
        .captures(date_of_birth)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
