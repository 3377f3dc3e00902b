// src/models/stats_models.rs - Run-level statistics derived from the result list
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::models::search::{SearchResult, SearchStatus};

/// Aggregate numbers for one scheduler run. Always computed from the final
/// result list, never accumulated while the run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_searches: usize,
    pub successful: usize,
    pub matches: usize,
    pub no_matches: usize,
    pub errors: usize,
    pub timeouts: usize,
    pub exact_matches: usize,
    pub partial_matches: usize,
    pub chunk_count: usize,
    pub chunks_used: usize,
    pub total_duration_secs: f64,
    pub total_search_secs: f64,
    pub avg_duration_secs: f64,
    pub throughput_per_minute: f64,
    pub success_rate: f64,
    pub match_rate: f64,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn from_results(
        results: &[SearchResult],
        total_duration: Duration,
        chunk_count: usize,
        cancelled: bool,
    ) -> Self {
        let total_searches = results.len();
        let count = |status: SearchStatus| results.iter().filter(|r| r.status == status).count();
        let errors = count(SearchStatus::Error);
        let timeouts = count(SearchStatus::Timeout);
        let no_matches = count(SearchStatus::NoMatch);
        let matches = results.iter().filter(|r| r.matches_found > 0).count();
        let chunks_used = results
            .iter()
            .filter_map(|r| r.chunk_id)
            .collect::<BTreeSet<_>>()
            .len();

        let total_duration_secs = total_duration.as_secs_f64();
        let total_search_secs: f64 = results.iter().map(|r| r.search_duration).sum();
        let avg_duration_secs = ratio(total_duration_secs, total_searches as f64);
        let throughput_per_minute = ratio(total_searches as f64, total_duration_secs / 60.0);

        Self {
            total_searches,
            successful: total_searches - errors,
            matches,
            no_matches,
            errors,
            timeouts,
            exact_matches: results.iter().map(|r| r.exact_matches).sum(),
            partial_matches: results.iter().map(|r| r.partial_matches).sum(),
            chunk_count,
            chunks_used,
            total_duration_secs,
            total_search_secs,
            avg_duration_secs,
            throughput_per_minute,
            success_rate: ratio((total_searches - errors) as f64, total_searches as f64) * 100.0,
            match_rate: ratio(matches as f64, total_searches as f64) * 100.0,
            cancelled,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
