// src/utils/progress_bars/progress_callback.rs - Per-request progress sinks for batch runs

use indicatif::ProgressBar;
use log::{debug, info};
use std::sync::Arc;

use crate::models::SearchResult;

/// Called after every request with `(completed, total, last_result)`. Must not block.
pub type ProgressSink = Arc<dyn Fn(usize, usize, Option<&SearchResult>) + Send + Sync>;

/// Logs every result at debug level and every 10% milestone at info level.
pub fn create_logging_sink(label: &str) -> ProgressSink {
    let label = label.to_string();
    Arc::new(move |completed: usize, total: usize, last: Option<&SearchResult>| {
        if let Some(result) = last {
            debug!(
                "[{}] {}/{} {} {} ({})",
                label,
                completed,
                total,
                result.status.emoji(),
                result.name,
                result.match_category
            );
        }
        let step = (total / 10).max(1);
        if completed == total || completed % step == 0 {
            let percent = if total > 0 {
                completed as f64 / total as f64 * 100.0
            } else {
                100.0
            };
            info!("[{}] 📈 Progress: {}/{} ({:.0}%)", label, completed, total, percent);
        }
    })
}

/// Drives an `indicatif` bar; the message shows the last searched name.
pub fn create_bar_sink(bar: ProgressBar) -> ProgressSink {
    Arc::new(move |completed: usize, total: usize, last: Option<&SearchResult>| {
        bar.set_length(total as u64);
        bar.set_position(completed as u64);
        if let Some(result) = last {
            bar.set_message(format!(
                "{} {} - {}",
                result.status.emoji(),
                result.name,
                result.match_category
            ));
        }
        if completed >= total {
            bar.finish_with_message("Batch complete");
        }
    })
}

/// Fans one update out to several sinks.
pub fn combine_sinks(sinks: Vec<ProgressSink>) -> ProgressSink {
    Arc::new(move |completed: usize, total: usize, last: Option<&SearchResult>| {
        for sink in &sinks {
            sink(completed, total, last);
        }
    })
}

/// Counts completed requests for one run and forwards to an optional sink.
pub struct ProgressTracker {
    sink: Option<ProgressSink>,
    completed: usize,
    total: usize,
}

impl ProgressTracker {
    pub fn new(sink: Option<ProgressSink>, total: usize) -> Self {
        Self {
            sink,
            completed: 0,
            total,
        }
    }

    pub fn record(&mut self, result: &SearchResult) {
        self.completed += 1;
        if let Some(ref sink) = self.sink {
            sink(self.completed, self.total, Some(result));
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Query;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn failed(name: &str) -> SearchResult {
        let q = Query::new(name, None).unwrap();
        SearchResult::failed(&q, "boom", 0.1, Some(1))
    }

    #[test]
    fn test_tracker_reports_every_record() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink: ProgressSink = Arc::new(move |completed, total, last| {
            let name = last.map(|r| r.name.clone()).unwrap_or_default();
            seen_clone.lock().unwrap().push((completed, total, name));
        });

        let mut tracker = ProgressTracker::new(Some(sink), 2);
        tracker.record(&failed("Jane Doe"));
        tracker.record(&failed("John Doe"));

        assert_eq!(tracker.completed(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (1, 2, "Jane Doe".to_string()),
                (2, 2, "John Doe".to_string())
            ]
        );
    }

    #[test]
    fn test_combined_sinks_all_fire() {
        let count = Arc::new(AtomicUsize::new(0));
        let make = |count: Arc<AtomicUsize>| -> ProgressSink {
            Arc::new(move |_, _, _| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let sink = combine_sinks(vec![
            make(Arc::clone(&count)),
            make(Arc::clone(&count)),
            create_logging_sink("test"),
        ]);
        sink(1, 1, None);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_bar_sink_tracks_position() {
        let bar = ProgressBar::hidden();
        let sink = create_bar_sink(bar.clone());
        sink(1, 3, Some(&failed("Jane Doe")));
        assert_eq!(bar.position(), 1);
        assert_eq!(bar.length(), Some(3));
    }

    #[test]
    fn test_tracker_without_sink() {
        let mut tracker = ProgressTracker::new(None, 1);
        tracker.record(&failed("Jane Doe"));
        assert_eq!(tracker.completed(), tracker.total());
    }
}
