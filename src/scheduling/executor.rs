// src/scheduling/executor.rs - Single-request search executors
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::SearchError;
use crate::matching::normalize::normalize_name;
use crate::models::{CandidateRecord, Query, RawSearchOutcome};

/// Runs one search against the records source. The scheduler guarantees at
/// most one in-flight call per run, so implementations may hold exclusive
/// session state. An empty candidate list is a normal "no results" outcome;
/// return `Err` (or set `error`) only for genuine execution failure.
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    async fn execute(&self, query: &Query) -> Result<RawSearchOutcome>;

    /// Best-effort resource cleanup between chunks.
    async fn reclaim(&self) {}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Candidates(Vec<CandidateRecord>),
    Outcome(RawSearchOutcome),
}

/// Serves recorded outcomes keyed by normalized query name. Unknown names
/// yield an empty (successful) result.
#[derive(Debug, Default)]
pub struct ReplayExecutor {
    outcomes: HashMap<String, RawSearchOutcome>,
    calls: AtomicUsize,
}

impl ReplayExecutor {
    pub fn new<I, K>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (K, RawSearchOutcome)>,
        K: AsRef<str>,
    {
        Self {
            outcomes: outcomes
                .into_iter()
                .map(|(name, outcome)| (normalize_name(name.as_ref()), outcome))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Loads `{ "NAME": [candidates...] }` or `{ "NAME": { "candidates": [...], "raw_status": "...", "error": ... } }`.
    pub fn from_json_str(raw: &str) -> Result<Self, SearchError> {
        let entries: HashMap<String, FixtureEntry> = serde_json::from_str(raw)
            .map_err(|e| SearchError::Fixture(format!("Invalid fixture JSON: {}", e)))?;

        Ok(Self::new(entries.into_iter().map(|(name, entry)| {
            let outcome = match entry {
                FixtureEntry::Candidates(candidates) => RawSearchOutcome::found(candidates),
                FixtureEntry::Outcome(outcome) => outcome,
            };
            (name, outcome)
        })))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SearchError> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))
            .map_err(|e| SearchError::Fixture(format!("{:#}", e)))?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchExecutor for ReplayExecutor {
    async fn execute(&self, query: &Query) -> Result<RawSearchOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = normalize_name(query.name());
        match self.outcomes.get(&key) {
            Some(outcome) => Ok(outcome.clone()),
            None => {
                debug!("No recorded outcome for '{}', returning no results", key);
                Ok(RawSearchOutcome::found(Vec::new()))
            }
        }
    }
}

/// Adapts an async closure into an executor.
pub struct FnExecutor<F> {
    func: F,
}

impl<F> FnExecutor<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> SearchExecutor for FnExecutor<F>
where
    F: Fn(Query) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RawSearchOutcome>> + Send,
{
    async fn execute(&self, query: &Query) -> Result<RawSearchOutcome> {
        (self.func)(query.clone()).await
    }
}
