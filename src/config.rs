use serde::Deserialize;
use std::path::PathBuf;

use crate::services::similarity::SimilarityMode;

/// What to do with a line whose fields do not parse
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Fail the run on the first malformed line
    #[default]
    Abort,
    /// Log the line and continue with the next one
    Skip,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Training ratings: `userId,movieId,rating`
    #[serde(default = "default_train_path")]
    pub train_path: PathBuf,

    /// Recommendation queries: `id,userId,movieId`
    #[serde(default = "default_test_path")]
    pub test_path: PathBuf,

    /// Submission file with `Id,Predicted` rows
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Append to an existing submission file instead of truncating it
    #[serde(default)]
    pub append_output: bool,

    /// Number of entries in the top movies / top users reports
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub parse_policy: ParsePolicy,

    #[serde(default)]
    pub similarity_mode: SimilarityMode,
}

fn default_train_path() -> PathBuf {
    PathBuf::from("train.csv")
}

fn default_test_path() -> PathBuf {
    PathBuf::from("test.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("submission.csv")
}

fn default_top_n() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            train_path: default_train_path(),
            test_path: default_test_path(),
            output_path: default_output_path(),
            append_output: false,
            top_n: default_top_n(),
            parse_policy: ParsePolicy::default(),
            similarity_mode: SimilarityMode::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
