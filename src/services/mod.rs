pub mod pipeline;
pub mod ranking;
pub mod recommender;
pub mod report;
pub mod similarity;

pub use pipeline::{run, run_with_console, RunSummary};
pub use recommender::Recommender;
pub use similarity::{cosine_similarity, SimilarityMode, SimilarityVector};
