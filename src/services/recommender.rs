use crate::{
    error::QueryError,
    models::{DenseRatingMatrix, Prediction, RecommendationQuery, RecommendationResult},
    services::similarity::{cosine_similarity, SimilarityMode},
};

/// Nearest-neighbor rating transfer over a filled matrix
///
/// A prediction is the rating given to the target movie by the most
/// similar other user who has actually rated it.
pub struct Recommender<'a> {
    matrix: &'a DenseRatingMatrix,
    mode: SimilarityMode,
}

impl<'a> Recommender<'a> {
    pub fn new(matrix: &'a DenseRatingMatrix, mode: SimilarityMode) -> Self {
        Self { matrix, mode }
    }

    /// Answers a single query
    ///
    /// Candidates are scanned in user id order and replaced only by a
    /// strictly greater similarity, so the first of several equally
    /// similar neighbors wins. A movie id past the matrix is unrated by
    /// everyone and resolves to `NoNeighborFound`.
    pub fn predict(&self, query: &RecommendationQuery) -> Result<Prediction, QueryError> {
        let query_vector = self
            .matrix
            .row(query.user_id)
            .ok_or(QueryError::UnknownUser {
                user_id: query.user_id,
                num_users: self.matrix.num_users(),
            })?;

        let similarities =
            cosine_similarity(query_vector, self.matrix, Some(query.user_id), self.mode);

        let mut best: Option<(usize, f64, f64)> = None;
        for (candidate, similarity) in similarities.candidates() {
            if candidate == query.user_id {
                continue;
            }
            let Some(rating) = self.matrix.rating(candidate, query.movie_id) else {
                continue;
            };
            if best.map_or(true, |(_, best_similarity, _)| similarity > best_similarity) {
                best = Some((candidate, similarity, rating));
            }
        }

        Ok(match best {
            Some((neighbor, similarity, rating)) => Prediction::Predicted {
                neighbor,
                similarity,
                rating,
            },
            None => Prediction::NoNeighborFound,
        })
    }

    /// Answers every query in order; a failing query never stops the batch
    pub fn predict_all(&self, queries: &[RecommendationQuery]) -> Vec<RecommendationResult> {
        queries
            .iter()
            .map(|query| {
                let outcome = self.predict(query);

                match &outcome {
                    Ok(prediction) => tracing::debug!(
                        query_id = %query.query_id,
                        user_id = query.user_id,
                        movie_id = query.movie_id,
                        rating = ?prediction.rating(),
                        "Query answered"
                    ),
                    Err(e) => tracing::warn!(
                        query_id = %query.query_id,
                        error = %e,
                        "Query failed"
                    ),
                }

                RecommendationResult {
                    query_id: query.query_id.clone(),
                    outcome,
                }
            })
            .collect()
    }
}
