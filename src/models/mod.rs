use std::fmt::Display;

use crate::error::QueryError;

pub mod matrix;

pub use matrix::{DenseRatingMatrix, UNRATED};

/// One `userId,movieId,rating` line of the training source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingObservation {
    pub user_id: usize,
    pub movie_id: usize,
    pub rating: f64,
}

impl RatingObservation {
    pub fn new(user_id: usize, movie_id: usize, rating: f64) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

/// One `id,userId,movieId` line of the query source
///
/// The id is external and echoed back unchanged, so it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationQuery {
    pub query_id: String,
    pub user_id: usize,
    pub movie_id: usize,
}

impl RecommendationQuery {
    pub fn new(query_id: impl Into<String>, user_id: usize, movie_id: usize) -> Self {
        Self {
            query_id: query_id.into(),
            user_id,
            movie_id,
        }
    }
}

/// Outcome of answering a single query against the matrix
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// The rating the most similar qualifying neighbor gave the movie
    Predicted {
        neighbor: usize,
        similarity: f64,
        rating: f64,
    },
    /// No other user both rated the movie and had a usable similarity
    NoNeighborFound,
}

impl Prediction {
    pub fn rating(&self) -> Option<f64> {
        match self {
            Prediction::Predicted { rating, .. } => Some(*rating),
            Prediction::NoNeighborFound => None,
        }
    }
}

/// A query id paired with its outcome, in query-source order
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    pub query_id: String,
    pub outcome: Result<Prediction, QueryError>,
}

impl RecommendationResult {
    /// The predicted rating, if one was found
    pub fn predicted_rating(&self) -> Option<f64> {
        self.outcome.as_ref().ok().and_then(Prediction::rating)
    }
}

impl Display for RecommendationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(Prediction::Predicted {
                neighbor,
                similarity,
                rating,
            }) => write!(
                f,
                "{}: {} (neighbor {}, similarity {:.4})",
                self.query_id, rating, neighbor, similarity
            ),
            Ok(Prediction::NoNeighborFound) => write!(f, "{}: no neighbor found", self.query_id),
            Err(e) => write!(f, "{}: {}", self.query_id, e),
        }
    }
}
