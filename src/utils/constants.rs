// src/utils/constants.rs

/// Requests at or below this count always run as a single chunk.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 5;
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 15;
/// Percent of total system memory in use above which chunks shrink.
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 80.0;
pub const DEFAULT_PAUSE_BETWEEN_CHUNKS_SECS: f64 = 2.0;
pub const DEFAULT_BIRTH_YEAR_TOLERANCE: i32 = 2;

pub const DEFAULT_SURNAME_MAX_EDITS: usize = 1;
pub const DEFAULT_GIVEN_NAME_MAX_EDITS: usize = 1;

/// Trailing tokens that may follow a full name without breaking an exact match.
pub const DEFAULT_NAME_SUFFIXES: [&str; 13] = [
    "JR", "SR", "II", "III", "IV", "V", "VI", "ESQ", "PHD", "MD", "DDS", "JD", "CPA",
];

/// Leading courtesy titles ignored on both sides of a comparison.
pub const DEFAULT_NAME_TITLES: [&str; 14] = [
    "MR", "MRS", "MS", "MISS", "DR", "PROF", "PROFESSOR", "SIR", "LADY", "LORD", "REV",
    "REVEREND", "FATHER", "SISTER",
];

/// Shortest token eligible for truncation or edit-distance relations.
pub const MIN_RELATED_TOKEN_LEN: usize = 3;
pub const NICKNAME_TOKEN_SCORE: f64 = 0.9;
/// Multiplier applied when the relation sits in the surname rather than the given name.
pub const SURNAME_EDIT_PENALTY: f64 = 0.9;
pub const MAX_PARTIAL_CONFIDENCE: f64 = 0.99;

pub const MIN_QUERY_NAME_LEN: usize = 2;
pub const MAX_QUERY_NAME_LEN: usize = 100;
