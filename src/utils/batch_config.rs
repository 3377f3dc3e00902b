// src/utils/batch_config.rs - Scheduler and matcher configuration read from the environment
use log::{debug, info, warn};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::sync::Arc;

use crate::error::SearchError;
use crate::matching::normalize::normalize_name;
use crate::matching::variations::NicknameTable;
use crate::utils::constants::*;

/// Chunking and throttling knobs for `ChunkedBatchScheduler`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    /// Percent in (0, 100].
    pub memory_threshold: f64,
    pub pause_between_chunks: f64,
    pub birth_year_tolerance: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
            pause_between_chunks: DEFAULT_PAUSE_BETWEEN_CHUNKS_SECS,
            birth_year_tolerance: DEFAULT_BIRTH_YEAR_TOLERANCE,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads through `lookup`; unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            min_chunk_size: parse_or(&lookup, "CHUNK_MIN_SIZE", defaults.min_chunk_size),
            max_chunk_size: parse_or(&lookup, "CHUNK_MAX_SIZE", defaults.max_chunk_size),
            memory_threshold: parse_or(&lookup, "CHUNK_MEMORY_THRESHOLD", defaults.memory_threshold),
            pause_between_chunks: parse_or(&lookup, "CHUNK_PAUSE_SECONDS", defaults.pause_between_chunks),
            birth_year_tolerance: parse_or(&lookup, "BIRTH_YEAR_TOLERANCE", defaults.birth_year_tolerance),
        };
        debug!("Scheduler config: {:?}", config);
        config
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.min_chunk_size < 1 {
            return Err(SearchError::InvalidConfiguration(
                "min_chunk_size must be at least 1".to_string(),
            ));
        }
        if self.max_chunk_size < self.min_chunk_size {
            return Err(SearchError::InvalidConfiguration(format!(
                "max_chunk_size ({}) must be >= min_chunk_size ({})",
                self.max_chunk_size, self.min_chunk_size
            )));
        }
        if !(self.memory_threshold > 0.0 && self.memory_threshold <= 100.0) {
            return Err(SearchError::InvalidConfiguration(format!(
                "memory_threshold must be in (0, 100], got {}",
                self.memory_threshold
            )));
        }
        if !self.pause_between_chunks.is_finite() || self.pause_between_chunks < 0.0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "pause_between_chunks must be >= 0, got {}",
                self.pause_between_chunks
            )));
        }
        if self.birth_year_tolerance < 0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "birth_year_tolerance must be >= 0, got {}",
                self.birth_year_tolerance
            )));
        }
        Ok(())
    }

    pub fn log_config(&self) {
        info!("🧩 Chunked scheduler configuration");
        info!(
            "   Chunk size: {}..={} (shrinks above {:.1}% memory)",
            self.min_chunk_size, self.max_chunk_size, self.memory_threshold
        );
        info!("   Pause between chunks: {:.1}s", self.pause_between_chunks);
        info!("   Birth year tolerance: ±{}", self.birth_year_tolerance);
    }
}

/// Token sets and edit bounds used by `NameMatchClassifier`.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub suffixes: HashSet<String>,
    pub titles: HashSet<String>,
    pub surname_max_edits: usize,
    pub given_name_max_edits: usize,
    pub nicknames: Arc<NicknameTable>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_NAME_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            titles: DEFAULT_NAME_TITLES.iter().map(|s| s.to_string()).collect(),
            surname_max_edits: DEFAULT_SURNAME_MAX_EDITS,
            given_name_max_edits: DEFAULT_GIVEN_NAME_MAX_EDITS,
            nicknames: Arc::new(NicknameTable::builtin()),
        }
    }
}

impl MatchingConfig {
    pub fn from_env() -> Result<Self, SearchError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// A missing or unreadable nickname table is an error; other bad values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let suffixes = token_list(&lookup, "NAME_SUFFIXES").unwrap_or(defaults.suffixes);
        let titles = token_list(&lookup, "NAME_TITLES").unwrap_or(defaults.titles);

        let nicknames = match lookup("NICKNAME_TABLE_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                let table = NicknameTable::from_json_file(Path::new(path.trim()))?;
                if table.is_empty() {
                    warn!("⚠️ Nickname table at {} is empty; only truncation and edit distance apply", path);
                }
                Arc::new(table)
            }
            None => defaults.nicknames,
        };

        Ok(Self {
            suffixes,
            titles,
            surname_max_edits: parse_or(&lookup, "SURNAME_MAX_EDITS", defaults.surname_max_edits),
            given_name_max_edits: parse_or(&lookup, "GIVEN_NAME_MAX_EDITS", defaults.given_name_max_edits),
            nicknames,
        })
    }

    pub fn is_suffix(&self, token: &str) -> bool {
        self.suffixes.contains(token)
    }

    pub fn is_title(&self, token: &str) -> bool {
        self.titles.contains(token)
    }

    pub fn log_config(&self) {
        let mut suffixes: Vec<&String> = self.suffixes.iter().collect();
        suffixes.sort();
        info!("🔤 Name matching configuration");
        info!("   Allowed suffixes: {:?}", suffixes);
        info!("   Titles ignored: {}", self.titles.len());
        info!(
            "   Max edits: given name {}, surname {}",
            self.given_name_max_edits, self.surname_max_edits
        );
        info!("   Nickname table entries: {}", self.nicknames.len());
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Ignoring invalid {}={:?}, using {:?}", key, raw, default);
            default
        }),
        None => default,
    }
}

fn token_list<F>(lookup: &F, key: &str) -> Option<HashSet<String>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|raw| {
        raw.split(',')
            .map(normalize_name)
            .filter(|s| !s.is_empty())
            .collect()
    })
}
