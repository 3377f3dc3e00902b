pub mod error;
pub mod matching;
pub mod models;
pub mod scheduling;
pub mod utils;
