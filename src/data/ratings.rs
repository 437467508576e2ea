use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use super::{open, parse_field, read_rows};
use crate::{
    config::ParsePolicy,
    error::{AppError, AppResult},
    models::RatingObservation,
};

/// Sparse (user, movie, rating) observations in source order
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    observations: Vec<RatingObservation>,
}

impl RatingStore {
    /// Reads a `userId,movieId,rating` file with a header line
    pub fn load(path: impl AsRef<Path>, policy: ParsePolicy) -> AppResult<Self> {
        let path = path.as_ref();
        let file = open(path)?;
        let store = Self::read(file, path, policy)?;

        tracing::info!(
            path = %path.display(),
            observations = store.len(),
            "Ratings loaded"
        );

        Ok(store)
    }

    /// Same as `load`, for an already-open source
    pub fn from_reader<R: Read>(reader: R, policy: ParsePolicy) -> AppResult<Self> {
        Self::read(reader, Path::new("<ratings>"), policy)
    }

    pub fn from_observations(observations: Vec<RatingObservation>) -> Self {
        Self { observations }
    }

    fn read<R: Read>(reader: R, path: &Path, policy: ParsePolicy) -> AppResult<Self> {
        let observations = read_rows(reader, path, policy, parse_observation)?;
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[RatingObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// `(max(userId) + 1, max(movieId) + 1)`, or `(0, 0)` when empty
    ///
    /// Fails when an id is so large that its dimension overflows `usize`.
    pub fn dimensions(&self) -> AppResult<(usize, usize)> {
        let (max_user, max_movie) = self.observations.iter().fold(
            (None, None),
            |(users, movies): (Option<usize>, Option<usize>), observation| {
                (
                    users.max(Some(observation.user_id)),
                    movies.max(Some(observation.movie_id)),
                )
            },
        );

        let extent = |max_id: Option<usize>| match max_id {
            Some(id) => id.checked_add(1),
            None => Some(0),
        };

        match (extent(max_user), extent(max_movie)) {
            (Some(num_users), Some(num_movies)) => Ok((num_users, num_movies)),
            _ => Err(AppError::Dimensions {
                num_users: max_user.map_or(0, |id| id as u128 + 1),
                num_movies: max_movie.map_or(0, |id| id as u128 + 1),
            }),
        }
    }
}

fn parse_observation(
    record: &StringRecord,
    path: &Path,
    line: u64,
) -> AppResult<RatingObservation> {
    Ok(RatingObservation {
        user_id: parse_field(record, 0, "userId", path, line)?,
        movie_id: parse_field(record, 1, "movieId", path, line)?,
        rating: parse_field(record, 2, "rating", path, line)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAIN: &str = "userId,movieId,rating\n1,1,5\n1,2,3\n2,1,4\n2,2,5\n";

    #[test]
    fn test_reads_observations_in_order() {
        let store = RatingStore::from_reader(TRAIN.as_bytes(), ParsePolicy::Abort).unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(store.observations()[0], RatingObservation::new(1, 1, 5.0));
        assert_eq!(store.observations()[3], RatingObservation::new(2, 2, 5.0));
    }

    #[test]
    fn test_dimensions_are_max_id_plus_one() {
        let store = RatingStore::from_reader(TRAIN.as_bytes(), ParsePolicy::Abort).unwrap();
        assert_eq!(store.dimensions().unwrap(), (3, 3));
    }

    #[test]
    fn test_larger_id_grows_dimension_exactly() {
        let mut observations = vec![RatingObservation::new(1, 1, 5.0)];
        let before = RatingStore::from_observations(observations.clone()).dimensions().unwrap();

        observations.push(RatingObservation::new(9, 1, 2.0));
        let after = RatingStore::from_observations(observations.clone()).dimensions().unwrap();
        assert_eq!(after, (10, before.1));

        observations.push(RatingObservation::new(2, 40, 2.0));
        let after = RatingStore::from_observations(observations).dimensions().unwrap();
        assert_eq!(after, (10, 41));
    }

    #[test]
    fn test_empty_source_has_no_dimensions() {
        let input = "userId,movieId,rating\n";
        let store = RatingStore::from_reader(input.as_bytes(), ParsePolicy::Abort).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dimensions().unwrap(), (0, 0));
    }

    #[test]
    fn test_trailing_timestamp_column_is_ignored() {
        let input = "userId,movieId,rating,timestamp\n3,4,2.5,964982703\n";
        let store = RatingStore::from_reader(input.as_bytes(), ParsePolicy::Abort).unwrap();
        assert_eq!(store.observations(), &[RatingObservation::new(3, 4, 2.5)]);
    }

    #[test]
    fn test_malformed_rating_aborts() {
        let input = "userId,movieId,rating\n1,1,5\n1,2,great\n";
        let err = RatingStore::from_reader(input.as_bytes(), ParsePolicy::Abort).unwrap_err();
        assert!(matches!(err, AppError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_malformed_rating_skipped() {
        let input = "userId,movieId,rating\n1,1,5\n1,2,great\n2,2,4\n";
        let store = RatingStore::from_reader(input.as_bytes(), ParsePolicy::Skip).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimensions().unwrap(), (3, 3));
    }

    #[test]
    fn test_id_at_usize_max_is_reported() {
        let input = format!("userId,movieId,rating\n1,{},5\n", usize::MAX);
        let store = RatingStore::from_reader(input.as_bytes(), ParsePolicy::Abort).unwrap();

        let err = store.dimensions().unwrap_err();

        match err {
            AppError::Dimensions {
                num_users,
                num_movies,
            } => {
                assert_eq!(num_users, 2);
                assert_eq!(num_movies, usize::MAX as u128 + 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_line_skipped() {
        let input: &[u8] = b"userId,movieId,rating\n1,1,5\n1,2,\xff\n2,2,4\n";

        let store = RatingStore::from_reader(input, ParsePolicy::Skip).unwrap();

        assert_eq!(
            store.observations(),
            &[
                RatingObservation::new(1, 1, 5.0),
                RatingObservation::new(2, 2, 4.0)
            ]
        );
    }

    #[test]
    fn test_non_utf8_line_aborts_as_parse_error() {
        let input: &[u8] = b"userId,movieId,rating\n1,1,5\n1,2,\xff\n2,2,4\n";

        let err = RatingStore::from_reader(input, ParsePolicy::Abort).unwrap_err();

        assert!(matches!(err, AppError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = RatingStore::load("no/such/train.csv", ParsePolicy::Abort).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
