use serde::Deserialize;

use crate::models::{DenseRatingMatrix, UNRATED};
use crate::services::ranking::{rank_ascending, ScoredId};

/// How unrated cells enter the cosine arithmetic
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMode {
    /// Unrated cells take part as the literal value -1, reproducing the
    /// scores of the legacy batch output. Approximate, not true cosine.
    #[default]
    Legacy,
    /// Unrated cells contribute nothing to the dot product or the norms
    RatedOnly,
}

impl SimilarityMode {
    fn cell(self, value: f64) -> f64 {
        match self {
            SimilarityMode::Legacy => value,
            SimilarityMode::RatedOnly if value == UNRATED => 0.0,
            SimilarityMode::RatedOnly => value,
        }
    }
}

/// Similarity of one query vector to every user row, indexed by user id
///
/// `None` marks candidates that can never be chosen: row 0, the excluded
/// user, and rows where the score is not finite (a zero norm).
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityVector {
    scores: Vec<Option<f64>>,
}

impl SimilarityVector {
    pub fn get(&self, user_id: usize) -> Option<f64> {
        self.scores.get(user_id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Selectable candidates as `(user_id, similarity)`, in user id order
    pub fn candidates(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.scores
            .iter()
            .enumerate()
            .filter_map(|(user_id, score)| score.map(|s| (user_id, s)))
    }

    /// Selectable candidates ordered by ascending similarity
    pub fn ranked(&self) -> Vec<ScoredId> {
        rank_ascending(
            self.candidates()
                .map(|(user_id, similarity)| ScoredId::new(user_id, similarity))
                .collect(),
        )
    }
}

/// Cosine similarity between `query_vector` and every row of `matrix`
///
/// Column 0 is skipped. `query_vector` is indexed by movie id like a
/// matrix row; cells past either length are ignored.
pub fn cosine_similarity(
    query_vector: &[f64],
    matrix: &DenseRatingMatrix,
    exclude: Option<usize>,
    mode: SimilarityMode,
) -> SimilarityVector {
    let query_norm = norm(query_vector, mode);
    let mut scores = Vec::with_capacity(matrix.num_users());

    for user_id in 0..matrix.num_users() {
        if user_id == 0 || Some(user_id) == exclude {
            scores.push(None);
            continue;
        }

        // Present for every user_id below num_users
        let row = matrix.row(user_id).unwrap_or_default();

        let numerator: f64 = query_vector
            .iter()
            .zip(row)
            .skip(1)
            .map(|(&q, &r)| mode.cell(q) * mode.cell(r))
            .sum();
        let similarity = numerator / (query_norm * norm(row, mode));

        scores.push(similarity.is_finite().then_some(similarity));
    }

    SimilarityVector { scores }
}

fn norm(vector: &[f64], mode: SimilarityMode) -> f64 {
    vector
        .iter()
        .skip(1)
        .map(|&v| {
            let v = mode.cell(v);
            v * v
        })
        .sum::<f64>()
        .sqrt()
}
