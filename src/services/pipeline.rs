use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::{
    config::Config,
    data::{read_queries, RatingStore, SubmissionWriter},
    error::{AppError, AppResult},
    models::{DenseRatingMatrix, Prediction, RecommendationResult},
    services::{
        recommender::Recommender,
        report::{top_movies, top_users},
    },
};

/// Counts from one end-to-end run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub num_users: usize,
    pub num_movies: usize,
    pub observations: usize,
    pub queries: usize,
    pub predicted: usize,
    pub no_neighbor: usize,
    pub failed: usize,
}

impl RunSummary {
    fn tally(&mut self, results: &[RecommendationResult]) {
        self.queries = results.len();
        for result in results {
            match &result.outcome {
                Ok(Prediction::Predicted { .. }) => self.predicted += 1,
                Ok(Prediction::NoNeighborFound) => self.no_neighbor += 1,
                Err(_) => self.failed += 1,
            }
        }
    }
}

/// Runs the whole batch, printing the console report to stdout
pub fn run(config: &Config) -> AppResult<RunSummary> {
    let stdout = std::io::stdout();
    let mut console = stdout.lock();
    run_with_console(config, &mut console)
}

/// Runs the whole batch
///
/// 1. Load the training ratings and build the matrix once
/// 2. Write dimensions and the top movie / user reports to `console`
/// 3. Answer every query against the read-only matrix
/// 4. Write the submission file in query order
pub fn run_with_console<W: Write>(config: &Config, console: &mut W) -> AppResult<RunSummary> {
    let start = Instant::now();

    let store = RatingStore::load(&config.train_path, config.parse_policy)?;
    let matrix = DenseRatingMatrix::from_store(&store)?;

    let mut summary = RunSummary {
        num_users: matrix.num_users(),
        num_movies: matrix.num_movies(),
        observations: store.len(),
        ..RunSummary::default()
    };
    drop(store);

    let console_error = |source| AppError::Io {
        path: PathBuf::from("<console>"),
        source,
    };
    writeln!(console, "Total number of users is: {}", matrix.num_users()).map_err(console_error)?;
    writeln!(console, "Total number of movies is: {}", matrix.num_movies()).map_err(console_error)?;
    write!(console, "{}", top_movies(&matrix, config.top_n)).map_err(console_error)?;
    writeln!(console, "\n").map_err(console_error)?;
    write!(console, "{}", top_users(&matrix, config.top_n)).map_err(console_error)?;

    let queries = read_queries(&config.test_path, config.parse_policy)?;
    let results = Recommender::new(&matrix, config.similarity_mode).predict_all(&queries);
    summary.tally(&results);

    let mut submission = SubmissionWriter::create(&config.output_path, config.append_output)?;
    submission.write_all(&results)?;
    submission.finish()?;

    tracing::info!(
        queries = summary.queries,
        predicted = summary.predicted,
        no_neighbor = summary.no_neighbor,
        failed = summary.failed,
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendation run completed"
    );

    Ok(summary)
}
