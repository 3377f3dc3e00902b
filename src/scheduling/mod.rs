pub mod executor;
pub mod planner;
pub mod scheduler;

pub use executor::{FnExecutor, ReplayExecutor, SearchExecutor};
pub use scheduler::{BatchRun, ChunkedBatchScheduler};
