use std::path::PathBuf;

/// Application-level errors
///
/// Everything here aborts a run, except `Parse` when the configured
/// policy is to skip malformed lines.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Parse error in {} at line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("A {num_users} x {num_movies} rating matrix cannot be allocated")]
    Dimensions { num_users: u128, num_movies: u128 },
}

/// Per-query failures
///
/// These never abort a batch: the failing query is reported and the next
/// one is answered.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("User {user_id} is not in the training matrix ({num_users} rows)")]
    UnknownUser { user_id: usize, num_users: usize },
}

pub type AppResult<T> = Result<T, AppError>;
