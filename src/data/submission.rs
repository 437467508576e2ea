use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::RecommendationResult,
};

/// Value written for queries that produced no rating
pub const NO_PREDICTION: &str = "-1";

const HEADER: [&str; 2] = ["Id", "Predicted"];

/// Two-column `Id,Predicted` result sink
pub struct SubmissionWriter<W: Write = File> {
    writer: csv::Writer<W>,
    path: PathBuf,
    rows: usize,
}

impl SubmissionWriter<File> {
    /// Opens the submission file
    ///
    /// Truncates by default. With `append`, existing rows are kept and the
    /// header is only written if the file is empty.
    pub fn create(path: impl AsRef<Path>, append: bool) -> AppResult<Self> {
        let path = path.as_ref();
        let io_error = |source| AppError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)
        } else {
            File::create(path)
        }
        .map_err(io_error)?;

        let write_header = file.metadata().map_err(io_error)?.len() == 0;

        tracing::debug!(path = %path.display(), append, write_header, "Submission file opened");

        Self::with_label(file, path, write_header)
    }
}

impl<W: Write> SubmissionWriter<W> {
    /// Wraps any writer, always starting with the header
    pub fn from_writer(writer: W) -> AppResult<Self> {
        Self::with_label(writer, Path::new("<submission>"), true)
    }

    fn with_label(writer: W, path: &Path, write_header: bool) -> AppResult<Self> {
        let mut submission = Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(writer),
            path: path.to_path_buf(),
            rows: 0,
        };
        if write_header {
            submission.write_row(&HEADER)?;
        }
        Ok(submission)
    }

    /// Writes one result; missing predictions become `NO_PREDICTION`
    pub fn write_result(&mut self, result: &RecommendationResult) -> AppResult<()> {
        let predicted = match result.predicted_rating() {
            Some(rating) => rating.to_string(),
            None => NO_PREDICTION.to_string(),
        };
        self.write_row(&[result.query_id.as_str(), predicted.as_str()])?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all(&mut self, results: &[RecommendationResult]) -> AppResult<()> {
        results.iter().try_for_each(|result| self.write_result(result))
    }

    /// Flushes and returns the underlying writer
    pub fn finish(self) -> AppResult<W> {
        let path = self.path;
        let rows = self.rows;
        let writer = self.writer.into_inner().map_err(|e| AppError::Io {
            path: path.clone(),
            source: e.into_error(),
        })?;

        tracing::info!(path = %path.display(), rows, "Submission written");

        Ok(writer)
    }

    fn write_row(&mut self, row: &[&str]) -> AppResult<()> {
        self.writer.write_record(row).map_err(|source| AppError::Csv {
            path: self.path.clone(),
            source,
        })
    }
}
