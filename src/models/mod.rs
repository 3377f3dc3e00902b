pub mod search;
pub mod stats_models;

pub use search::{
    BatchClassification, CandidateRecord, MatchCategory, MatchType, MatchVerdict, Query,
    RawSearchOutcome, SearchResult, SearchStatus, RAW_STATUS_ERROR, RAW_STATUS_OK, RAW_STATUS_TIMEOUT,
};
pub use stats_models::BatchSummary;
