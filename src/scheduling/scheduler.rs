// src/scheduling/scheduler.rs - Sequential chunked batch runner with per-request isolation
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::SearchError;
use crate::matching::BatchClassifier;
use crate::models::{BatchSummary, Query, RawSearchOutcome, SearchResult, RAW_STATUS_ERROR};
use crate::scheduling::executor::SearchExecutor;
use crate::scheduling::planner;
use crate::utils::batch_config::SchedulerConfig;
use crate::utils::progress_bars::logging::SearchLogger;
use crate::utils::progress_bars::progress_callback::{ProgressSink, ProgressTracker};
use crate::utils::{MemoryProbe, SystemMemoryProbe};

/// Everything one `run` produced. `results` is in request order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRun {
    pub run_id: String,
    pub results: Vec<SearchResult>,
    pub summary: BatchSummary,
    pub chunk_count: usize,
    pub cancelled: bool,
}

/// Drives requests through an executor one at a time, chunk by chunk.
pub struct ChunkedBatchScheduler<M: MemoryProbe = SystemMemoryProbe> {
    config: SchedulerConfig,
    classifier: BatchClassifier,
    probe: M,
}

impl ChunkedBatchScheduler<SystemMemoryProbe> {
    pub fn new(config: SchedulerConfig, classifier: BatchClassifier) -> Self {
        Self::with_probe(config, classifier, SystemMemoryProbe)
    }
}

impl<M: MemoryProbe> ChunkedBatchScheduler<M> {
    pub fn with_probe(config: SchedulerConfig, classifier: BatchClassifier, probe: M) -> Self {
        Self {
            config,
            classifier,
            probe,
        }
    }

    /// Runs every request, at most one in flight. A failing or panicking request
    /// becomes an Error result and the run continues. Cancellation is checked
    /// before each chunk, before each request and during the inter-chunk pause;
    /// results gathered so far are returned. Only an invalid configuration is an `Err`.
    pub async fn run<E>(
        &self,
        requests: &[Query],
        executor: &E,
        progress: Option<ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<BatchRun, SearchError>
    where
        E: SearchExecutor + ?Sized,
    {
        self.config.validate()?;

        let run_id = Uuid::new_v4().to_string();
        let logger = SearchLogger::new(&run_id);
        let started = Instant::now();

        if requests.is_empty() {
            logger.log_debug("No requests to run");
            return Ok(BatchRun {
                run_id,
                results: Vec::new(),
                summary: BatchSummary::from_results(&[], Duration::ZERO, 0, false),
                chunk_count: 0,
                cancelled: false,
            });
        }

        logger.log_start(requests.len(), self.probe.memory_mb());

        logger.log_phase("Planning", None);
        let memory_ratio = self.probe.memory_ratio();
        let chunks = planner::plan(requests, memory_ratio, &self.config);
        let chunk_count = chunks.len();
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        logger.log_chunk_plan(&sizes, memory_ratio);

        let mut tracker = ProgressTracker::new(progress, requests.len());
        let mut results: Vec<SearchResult> = Vec::with_capacity(requests.len());
        let mut cancelled = false;

        for (index, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let chunk_id = index + 1;
            let chunk_started = Instant::now();
            let first_in_chunk = results.len();
            logger.log_chunk_start(chunk_id, chunk_count, chunk.len(), self.probe.memory_mb());

            for query in chunk.iter() {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break;
                }
                let result = self.search_one(query, executor, chunk_id, &logger).await;
                logger.log_result(&result);
                tracker.record(&result);
                results.push(result);
            }

            logger.log_chunk_complete(chunk_id, &results[first_in_chunk..], chunk_started.elapsed());

            if AssertUnwindSafe(executor.reclaim()).catch_unwind().await.is_err() {
                logger.log_warning(&format!("Resource reclaim panicked after chunk {}", chunk_id));
            }

            if cancelled {
                break;
            }

            if chunk_id < chunk_count && self.config.pause_between_chunks > 0.0 {
                logger.log_pause(self.config.pause_between_chunks);
                let pause = Duration::from_secs_f64(self.config.pause_between_chunks);
                let interrupted = tokio::select! {
                    _ = cancel.cancelled() => true,
                    _ = tokio::time::sleep(pause) => false,
                };
                if interrupted {
                    cancelled = true;
                    break;
                }
            }
        }

        if cancelled {
            logger.log_cancelled(results.len(), requests.len());
        }

        logger.log_phase("Aggregating", Some(&format!("{} result(s)", results.len())));
        let summary = BatchSummary::from_results(&results, started.elapsed(), chunk_count, cancelled);
        logger.log_completion(&summary, self.probe.memory_mb());

        Ok(BatchRun {
            run_id,
            results,
            summary,
            chunk_count,
            cancelled,
        })
    }

    async fn search_one<E>(
        &self,
        query: &Query,
        executor: &E,
        chunk_id: usize,
        logger: &SearchLogger,
    ) -> SearchResult
    where
        E: SearchExecutor + ?Sized,
    {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(executor.execute(query)).catch_unwind().await;
        let duration = started.elapsed().as_secs_f64();

        match outcome {
            Ok(Ok(raw)) => self.interpret(query, raw, duration, chunk_id, logger),
            Ok(Err(e)) => {
                let message = format!("{:#}", e);
                logger.log_request_failed(query.name(), &message);
                SearchResult::failed(query, message, duration, Some(chunk_id))
            }
            Err(payload) => {
                let message = format!("executor panicked: {}", panic_message(payload.as_ref()));
                logger.log_request_failed(query.name(), &message);
                SearchResult::failed(query, message, duration, Some(chunk_id))
            }
        }
    }

    fn interpret(
        &self,
        query: &Query,
        raw: RawSearchOutcome,
        duration: f64,
        chunk_id: usize,
        logger: &SearchLogger,
    ) -> SearchResult {
        if raw.is_timeout() {
            let message = raw
                .error
                .unwrap_or_else(|| "executor reported a timeout".to_string());
            logger.log_request_failed(query.name(), &message);
            return SearchResult::timed_out(query, message, duration, Some(chunk_id));
        }

        let reported_error = raw.error.as_deref().map(str::trim).filter(|e| !e.is_empty());
        if reported_error.is_some() || raw.raw_status.trim().eq_ignore_ascii_case(RAW_STATUS_ERROR) {
            let message = reported_error
                .map(str::to_string)
                .unwrap_or_else(|| format!("executor reported status '{}'", raw.raw_status.trim()));
            logger.log_request_failed(query.name(), &message);
            return SearchResult::failed(query, message, duration, Some(chunk_id));
        }

        let classified = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.classifier.classify_batch(query, &raw.candidates)
        }));
        match classified {
            Ok(classification) => SearchResult::classified(query, classification, duration, Some(chunk_id)),
            Err(payload) => {
                let message = format!("classification panicked: {}", panic_message(payload.as_ref()));
                logger.log_request_failed(query.name(), &message);
                SearchResult::failed(query, message, duration, Some(chunk_id))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
