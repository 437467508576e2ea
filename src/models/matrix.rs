use crate::{
    data::RatingStore,
    error::{AppError, AppResult},
};

/// Cell value meaning "this user has not rated this movie"
pub const UNRATED: f64 = -1.0;

/// Dense user x movie rating matrix
///
/// Row-major flat storage. Ids in the data are 1-based, so row 0 and
/// column 0 are allocated but never hold real ratings and are skipped by
/// every count and similarity loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRatingMatrix {
    cells: Vec<f64>,
    num_users: usize,
    num_movies: usize,
}

impl DenseRatingMatrix {
    /// Creates a matrix with every cell set to `UNRATED`
    ///
    /// Fails instead of panicking when the cell count overflows or the
    /// allocation cannot be made.
    pub fn new(num_users: usize, num_movies: usize) -> AppResult<Self> {
        let too_large = || AppError::Dimensions {
            num_users: num_users as u128,
            num_movies: num_movies as u128,
        };

        let len = num_users.checked_mul(num_movies).ok_or_else(too_large)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, UNRATED);

        Ok(Self {
            cells,
            num_users,
            num_movies,
        })
    }

    /// Sizes the matrix from the store's dimensions and fills it in source order
    ///
    /// Duplicate (user, movie) pairs keep the last rating seen.
    pub fn from_store(store: &RatingStore) -> AppResult<Self> {
        let (num_users, num_movies) = store.dimensions()?;
        let mut matrix = Self::new(num_users, num_movies)?;

        for observation in store.observations() {
            let index = matrix.offset(observation.user_id, observation.movie_id);
            matrix.cells[index] = observation.rating;
        }

        tracing::info!(
            num_users,
            num_movies,
            observations = store.len(),
            "Rating matrix filled"
        );

        Ok(matrix)
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn num_movies(&self) -> usize {
        self.num_movies
    }

    /// The rating at (user, movie), or `None` when unrated or out of bounds
    pub fn rating(&self, user_id: usize, movie_id: usize) -> Option<f64> {
        self.raw(user_id, movie_id).filter(|&value| value != UNRATED)
    }

    /// The raw cell, `UNRATED` included, or `None` when out of bounds
    pub fn raw(&self, user_id: usize, movie_id: usize) -> Option<f64> {
        if user_id >= self.num_users || movie_id >= self.num_movies {
            return None;
        }
        Some(self.cells[self.offset(user_id, movie_id)])
    }

    /// The user's full row of raw cells, or `None` for an unknown user
    pub fn row(&self, user_id: usize) -> Option<&[f64]> {
        if user_id >= self.num_users {
            return None;
        }
        let start = user_id * self.num_movies;
        Some(&self.cells[start..start + self.num_movies])
    }

    /// Number of real ratings a user has, ignoring column 0
    pub fn rated_count_in_row(&self, user_id: usize) -> usize {
        self.row(user_id)
            .map(|row| row.iter().skip(1).filter(|&&v| v != UNRATED).count())
            .unwrap_or(0)
    }

    /// Number of users who rated a movie, ignoring row 0
    pub fn rated_count_in_column(&self, movie_id: usize) -> usize {
        if movie_id >= self.num_movies {
            return 0;
        }
        (1..self.num_users)
            .filter(|&user_id| self.cells[self.offset(user_id, movie_id)] != UNRATED)
            .count()
    }

    fn offset(&self, user_id: usize, movie_id: usize) -> usize {
        user_id * self.num_movies + movie_id
    }
}
