// src/utils/progress_bars/logging.rs - Run-tagged logging helpers for the batch scheduler
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::models::{BatchSummary, SearchResult};

#[derive(Clone)]
pub struct SearchLogger {
    run_tag: String,
    start_time: Instant,
}

impl SearchLogger {
    /// `run_id` is shortened to its first 8 chars for the line prefix.
    pub fn new(run_id: &str) -> Self {
        Self {
            run_tag: run_id.chars().take(8).collect(),
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, total_requests: usize, memory_mb: u64) {
        info!(
            "[SEARCH {}] 🚀 Starting batch search of {} name(s) (memory: {} MB)",
            self.run_tag, total_requests, memory_mb
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[SEARCH {}] 🔄 Phase: {} - {} [+{:.1}s]",
                self.run_tag, phase, details, elapsed.as_secs_f32()
            ),
            None => info!(
                "[SEARCH {}] 🔄 Phase: {} [+{:.1}s]",
                self.run_tag, phase, elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_chunk_plan(&self, chunk_sizes: &[usize], memory_ratio: f64) {
        info!(
            "[SEARCH {}] 🧩 Planned {} chunk(s) {:?} at {:.1}% memory",
            self.run_tag,
            chunk_sizes.len(),
            chunk_sizes,
            memory_ratio * 100.0
        );
    }

    pub fn log_chunk_start(&self, chunk_id: usize, chunk_count: usize, size: usize, memory_mb: u64) {
        info!(
            "[SEARCH {}] 📦 Chunk {}/{}: {} search(es) (memory: {} MB)",
            self.run_tag, chunk_id, chunk_count, size, memory_mb
        );
    }

    pub fn log_chunk_complete(&self, chunk_id: usize, results: &[SearchResult], elapsed: Duration) {
        let matches = results.iter().filter(|r| r.matches_found > 0).count();
        let errors = results.iter().filter(|r| r.is_error()).count();
        info!(
            "[SEARCH {}] ✅ Chunk {} done in {:.1}s: {} match(es), {} error(s)",
            self.run_tag,
            chunk_id,
            elapsed.as_secs_f64(),
            matches,
            errors
        );
    }

    pub fn log_result(&self, result: &SearchResult) {
        debug!(
            "[SEARCH {}] {} {} -> {} ({}) in {:.2}s",
            self.run_tag,
            result.status.emoji(),
            result.name,
            result.match_category,
            result.match_reasoning,
            result.search_duration
        );
    }

    pub fn log_pause(&self, seconds: f64) {
        info!("[SEARCH {}] ⏸️  Pausing {:.1}s before next chunk", self.run_tag, seconds);
    }

    pub fn log_request_failed(&self, name: &str, message: &str) {
        warn!("[SEARCH {}] ❌ Search for '{}' failed: {}", self.run_tag, name, message);
    }

    pub fn log_cancelled(&self, completed: usize, total: usize) {
        warn!(
            "[SEARCH {}] 🛑 Cancelled after {}/{} search(es); keeping partial results",
            self.run_tag, completed, total
        );
    }

    pub fn log_completion(&self, summary: &BatchSummary, memory_mb: u64) {
        info!(
            "[SEARCH {}] 🏁 Completed {} search(es) in {:.1}s across {} chunk(s)",
            self.run_tag, summary.total_searches, summary.total_duration_secs, summary.chunk_count
        );
        info!(
            "[SEARCH {}] 📊 Matches: {} ({} exact, {} partial) | No match: {} | Errors: {} | Timeouts: {}",
            self.run_tag,
            summary.matches,
            summary.exact_matches,
            summary.partial_matches,
            summary.no_matches,
            summary.errors,
            summary.timeouts
        );
        info!(
            "[SEARCH {}] ⚡ Throughput: {:.1}/min | Success rate: {:.1}% | Match rate: {:.1}% | Memory: {} MB",
            self.run_tag,
            summary.throughput_per_minute,
            summary.success_rate,
            summary.match_rate,
            memory_mb
        );
        if summary.errors > 0 {
            warn!(
                "[SEARCH {}] ⚠️  {} search(es) could not be completed",
                self.run_tag, summary.errors
            );
        }
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[SEARCH {}] ⚠️  {}", self.run_tag, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[SEARCH {}] {}", self.run_tag, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tag_is_shortened() {
        let logger = SearchLogger::new("0123456789abcdef");
        assert_eq!(logger.run_tag, "01234567");
        let short = SearchLogger::new("abc");
        assert_eq!(short.run_tag, "abc");
    }
}
