use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use super::{open, parse_field, read_rows};
use crate::{config::ParsePolicy, error::AppError, error::AppResult, models::RecommendationQuery};

/// Reads an `id,userId,movieId` file with a header line, in file order
pub fn read_queries(
    path: impl AsRef<Path>,
    policy: ParsePolicy,
) -> AppResult<Vec<RecommendationQuery>> {
    let path = path.as_ref();
    let file = open(path)?;
    let queries = read_rows(file, path, policy, parse_query)?;

    tracing::info!(path = %path.display(), queries = queries.len(), "Queries loaded");

    Ok(queries)
}

/// Same as `read_queries`, for an already-open source
pub fn queries_from_reader<R: Read>(
    reader: R,
    policy: ParsePolicy,
) -> AppResult<Vec<RecommendationQuery>> {
    read_rows(reader, Path::new("<queries>"), policy, parse_query)
}

fn parse_query(record: &StringRecord, path: &Path, line: u64) -> AppResult<RecommendationQuery> {
    let query_id = match record.get(0) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return Err(AppError::Parse {
                path: path.to_path_buf(),
                line,
                message: "missing field `id`".to_string(),
            })
        }
    };

    Ok(RecommendationQuery {
        query_id,
        user_id: parse_field(record, 1, "userId", path, line)?,
        movie_id: parse_field(record, 2, "movieId", path, line)?,
    })
}
