//! Rating and query sources, submission sink
//!
//! Both sources are CSV with a header line that is ignored. Fields are
//! read by position, so the header text does not matter and trailing
//! columns (a timestamp, say) are tolerated.
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;

use crate::{
    config::ParsePolicy,
    error::{AppError, AppResult},
};

pub mod queries;
pub mod ratings;
pub mod submission;

pub use queries::{queries_from_reader, read_queries};
pub use ratings::RatingStore;
pub use submission::SubmissionWriter;

/// Opens a file for reading, attributing failures to its path
pub(crate) fn open(path: &Path) -> AppResult<File> {
    File::open(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every data line of a headed CSV source through `parse_row`
///
/// Malformed lines either abort the read or are logged and dropped,
/// depending on `policy`. The reader is dropped on every return path.
pub(crate) fn read_rows<R, T, F>(
    reader: R,
    path: &Path,
    policy: ParsePolicy,
    parse_row: F,
) -> AppResult<Vec<T>>
where
    R: Read,
    F: Fn(&StringRecord, &Path, u64) -> AppResult<T>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.records() {
        let parsed = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                parse_row(&record, path, line)
            }
            Err(source) => Err(record_error(path, source)),
        };

        match parsed {
            Ok(row) => rows.push(row),
            Err(AppError::Parse { line, message, .. }) if policy == ParsePolicy::Skip => {
                tracing::warn!(line, error = %message, "Skipping malformed line");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            kept = rows.len(),
            "Some lines could not be parsed"
        );
    }

    Ok(rows)
}

/// A line that is not valid UTF-8 is a malformed line like any other;
/// everything else the reader reports is fatal
fn record_error(path: &Path, source: csv::Error) -> AppError {
    match source.kind() {
        csv::ErrorKind::Utf8 { pos, err } => AppError::Parse {
            path: path.to_path_buf(),
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            message: format!("invalid UTF-8: {}", err),
        },
        _ => AppError::Csv {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Parses the field at `index`, naming it in the error
pub(crate) fn parse_field<T>(
    record: &StringRecord,
    index: usize,
    name: &str,
    path: &Path,
    line: u64,
) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| AppError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("missing field `{}`", name),
    })?;

    raw.parse::<T>().map_err(|e| AppError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("field `{}` = {:?}: {}", name, raw, e),
    })
}
