// src/error.rs - Typed errors surfaced by the search core
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Fatal precondition violation, raised before any chunk starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Input file error: {0}")]
    InputFile(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}
