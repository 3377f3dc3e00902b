// src/matching/mod.rs
pub mod batch;
pub mod name;
pub mod normalize;
pub mod variations;

pub use batch::BatchClassifier;
pub use name::{NameMatch, NameMatchClassifier};
pub use normalize::{normalize, normalize_name};
pub use variations::NicknameTable;
